use std::mem;

use anyhow::{Result, bail};

use crate::sitewise::Reading;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 10;

/// Readings for one SiteWise asset property, waiting to be uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    asset_id: String,
    property_id: String,
    readings: Vec<Reading>,
    capacity: usize,
}

impl Channel {
    pub fn new(asset_id: impl Into<String>, property_id: impl Into<String>, capacity: usize) -> Self {
        Self {
            asset_id: asset_id.into(),
            property_id: property_id.into(),
            readings: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    pub fn property_id(&self) -> &str {
        &self.property_id
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.readings.len() >= self.capacity
    }

    pub fn push(&mut self, reading: Reading) -> Result<()> {
        if self.is_full() {
            bail!(
                "channel {}/{} is full: capacity {}",
                self.asset_id,
                self.property_id,
                self.capacity
            );
        }

        self.readings.push(reading);

        Ok(())
    }

    /// Moves the accumulated readings into a new channel with the same
    /// identifiers, leaving this one empty.
    pub fn take(&mut self) -> Channel {
        let readings = mem::replace(&mut self.readings, Vec::with_capacity(self.capacity));

        Channel {
            asset_id: self.asset_id.clone(),
            property_id: self.property_id.clone(),
            readings,
            capacity: self.capacity,
        }
    }
}
