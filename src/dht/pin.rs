use core::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// The single data line a DHT sensor is wired to.
///
/// One `delay_us(1)` is the tick the decoder counts while polling, so an
/// implementation backed by real hardware must not return early.
pub trait SensorPin {
    type Error: Debug;

    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;

    /// Only meaningful while the direction is [`Direction::Output`].
    fn set_level(&mut self, level: Level) -> Result<(), Self::Error>;

    fn level(&mut self) -> Result<Level, Self::Error>;

    fn delay_us(&mut self, us: u32);
}
