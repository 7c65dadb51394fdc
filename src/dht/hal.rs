use std::{
    hint, thread,
    time::{Duration, Instant},
};

use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin, OutputPin},
};

use crate::dht::{Direction, Level, SensorPin};

/// Delays at least this long go to the scheduler instead of spinning.
const SLEEP_THRESHOLD: Duration = Duration::from_millis(1);

/// A [`DelayNs`] that busy-waits on the monotonic clock, so that one
/// `delay_us(1)` lasts about a microsecond and the decoder's tick counts
/// track real time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinDelay;

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        let duration = Duration::from_nanos(u64::from(ns));
        if duration >= SLEEP_THRESHOLD {
            thread::sleep(duration);
            return;
        }

        let deadline = Instant::now() + duration;
        while Instant::now() < deadline {
            hint::spin_loop();
        }
    }
}

/// Adapts an open-drain `embedded-hal` pin to [`SensorPin`].
///
/// An open-drain line has no separate input mode: releasing it means
/// driving it high and letting the pull-up (or the sensor) decide the level.
#[derive(Debug)]
pub struct OpenDrainPin<P, D> {
    pin: P,
    delay: D,
    direction: Direction,
}

impl<P, D> OpenDrainPin<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    pub fn new(pin: P, delay: D) -> Self {
        Self {
            pin,
            delay,
            direction: Direction::Input,
        }
    }

    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

impl<P, D> SensorPin for OpenDrainPin<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    type Error = <P as ErrorType>::Error;

    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        if direction == Direction::Input {
            self.pin.set_high()?;
        }
        self.direction = direction;

        Ok(())
    }

    fn set_level(&mut self, level: Level) -> Result<(), Self::Error> {
        if self.direction == Direction::Input {
            return Ok(());
        }

        match level {
            Level::Low => self.pin.set_low(),
            Level::High => self.pin.set_high(),
        }
    }

    fn level(&mut self) -> Result<Level, Self::Error> {
        Ok(if self.pin.is_high()? {
            Level::High
        } else {
            Level::Low
        })
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}
