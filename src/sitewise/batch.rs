use anyhow::{Result, ensure};

use crate::sitewise::Channel;

/// Temperature and humidity readings taken at the same sample instants.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    temperature: Channel,
    humidity: Channel,
}

impl Batch {
    pub fn new(temperature: Channel, humidity: Channel) -> Result<Self> {
        ensure!(
            temperature.len() == humidity.len(),
            "channel lengths differ: temperature {}, humidity {}",
            temperature.len(),
            humidity.len()
        );

        Ok(Self {
            temperature,
            humidity,
        })
    }

    /// Drains both channels into a batch. Nothing is drained if their
    /// lengths differ.
    pub fn drain(temperature: &mut Channel, humidity: &mut Channel) -> Result<Self> {
        ensure!(
            temperature.len() == humidity.len(),
            "channel lengths differ: temperature {}, humidity {}",
            temperature.len(),
            humidity.len()
        );

        Self::new(temperature.take(), humidity.take())
    }

    pub fn temperature(&self) -> &Channel {
        &self.temperature
    }

    pub fn humidity(&self) -> &Channel {
        &self.humidity
    }

    pub fn channels(&self) -> [&Channel; 2] {
        [&self.temperature, &self.humidity]
    }

    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }
}
