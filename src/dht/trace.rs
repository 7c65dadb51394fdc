use std::{collections::VecDeque, convert::Infallible};

use crate::dht::{Direction, FRAME_LEN, Level, SensorPin};

const ACK_LOW_US: u32 = 80;
const ACK_HIGH_US: u32 = 80;
const BIT_SYNC_US: u32 = 50;
const ZERO_HIGH_US: u32 = 26;
const ONE_HIGH_US: u32 = 70;

/// A stretch of time during which the sensor holds the line at one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub level: Level,
    pub duration_us: u32,
}

impl Segment {
    pub fn new(level: Level, duration_us: u32) -> Self {
        Self { level, duration_us }
    }
}

/// What the sensor does to the line after the host releases it, up to the
/// point where it goes quiet and the line settles at `idle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTrace {
    segments: Vec<Segment>,
    idle: Level,
}

impl LineTrace {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            idle: Level::High,
        }
    }

    pub fn with_idle(mut self, idle: Level) -> Self {
        self.idle = idle;
        self
    }

    /// A nominally timed response carrying `bytes`, checksum included as given.
    pub fn sensor_response(bytes: [u8; FRAME_LEN]) -> Self {
        let high = bytes.iter().flat_map(|byte| {
            (0..8).rev().map(move |i| {
                if byte >> i & 1 == 1 {
                    ONE_HIGH_US
                } else {
                    ZERO_HIGH_US
                }
            })
        });

        Self::from_high_durations(high)
    }

    /// A response whose data bits have the given high-phase lengths, in
    /// transmission order.
    pub fn from_high_durations(high: impl IntoIterator<Item = u32>) -> Self {
        let mut segments = vec![
            Segment::new(Level::Low, ACK_LOW_US),
            Segment::new(Level::High, ACK_HIGH_US),
        ];
        for duration_us in high {
            segments.push(Segment::new(Level::Low, BIT_SYNC_US));
            segments.push(Segment::new(Level::High, duration_us));
        }
        segments.push(Segment::new(Level::Low, BIT_SYNC_US));

        Self::new(segments)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    fn level_at(&self, elapsed_us: u64) -> Level {
        let mut end = 0u64;
        for segment in &self.segments {
            end += u64::from(segment.duration_us);
            if elapsed_us < end {
                return segment.level;
            }
        }

        self.idle
    }
}

/// A [`SensorPin`] that plays back one [`LineTrace`] per read attempt.
///
/// Time only advances through `delay_us`. Each time the host releases the
/// line after driving it, the next trace starts from zero; once the traces
/// run out the line floats high as if no sensor were attached.
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    pending: VecDeque<LineTrace>,
    current: LineTrace,
    direction: Direction,
    elapsed_us: u64,
    driven: Vec<(Level, u32)>,
}

impl SimulatedSensor {
    pub fn new(traces: impl IntoIterator<Item = LineTrace>) -> Self {
        Self {
            pending: traces.into_iter().collect(),
            current: LineTrace::new(Vec::new()),
            direction: Direction::Input,
            elapsed_us: 0,
            driven: Vec::new(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Levels the host drove while in output mode, with how long each was held.
    pub fn driven(&self) -> &[(Level, u32)] {
        &self.driven
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl SensorPin for SimulatedSensor {
    type Error = Infallible;

    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        if self.direction == Direction::Output && direction == Direction::Input {
            self.current = self
                .pending
                .pop_front()
                .unwrap_or_else(|| LineTrace::new(Vec::new()));
            self.elapsed_us = 0;
        }
        self.direction = direction;

        Ok(())
    }

    fn set_level(&mut self, level: Level) -> Result<(), Self::Error> {
        if self.direction == Direction::Output {
            self.driven.push((level, 0));
        }

        Ok(())
    }

    fn level(&mut self) -> Result<Level, Self::Error> {
        Ok(match self.direction {
            Direction::Output => self.driven.last().map_or(Level::High, |(level, _)| *level),
            Direction::Input => self.current.level_at(self.elapsed_us),
        })
    }

    fn delay_us(&mut self, us: u32) {
        match self.direction {
            Direction::Output => {
                if let Some((_, held)) = self.driven.last_mut() {
                    *held += us;
                }
            }
            Direction::Input => self.elapsed_us += u64::from(us),
        }
    }
}
