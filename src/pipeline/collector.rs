use std::{thread, time::Duration};

use anyhow::{Context as _, Result};
use tracing::{info, warn};

use crate::{
    clock::Clock,
    dht::{DecodeError, ProtocolDecoder, SensorFamily, SensorPin},
    pipeline::BatchSender,
    sitewise::{Batch, Channel, Reading},
};

/// What one sampling tick did.
#[derive(Debug)]
pub enum Tick<E: std::fmt::Debug> {
    /// A reading was appended; `pending` samples are now waiting.
    Collected { pending: usize },
    /// A reading filled the channels and the batch was handed to the queue.
    Flushed,
    /// The sensor read failed and nothing was recorded.
    Skipped(DecodeError<E>),
}

/// Owns the sensor and the two channels for the lifetime of the sampling
/// thread.
pub struct SampleCollector<P, C> {
    decoder: ProtocolDecoder<P>,
    family: SensorFamily,
    temperature: Channel,
    humidity: Channel,
    sender: BatchSender,
    clock: C,
}

impl<P, C> SampleCollector<P, C>
where
    P: SensorPin,
    C: Clock,
{
    pub fn new(
        decoder: ProtocolDecoder<P>,
        family: SensorFamily,
        temperature: Channel,
        humidity: Channel,
        sender: BatchSender,
        clock: C,
    ) -> Self {
        Self {
            decoder,
            family,
            temperature,
            humidity,
            sender,
            clock,
        }
    }

    pub fn temperature(&self) -> &Channel {
        &self.temperature
    }

    pub fn humidity(&self) -> &Channel {
        &self.humidity
    }

    pub fn collect_once(&mut self) -> Result<Tick<P::Error>> {
        let frame = match self.decoder.decode() {
            Ok(frame) => frame,
            Err(err) => {
                warn!("failed to read from {} sensor: {err}", self.family);
                return Ok(Tick::Skipped(err));
            }
        };

        let measurement = self.family.decode(&frame);
        let timestamp_seconds = self.clock.now().timestamp();

        self.temperature.push(Reading {
            value: measurement.temperature_celsius,
            timestamp_seconds,
        })?;
        self.humidity.push(Reading {
            value: measurement.humidity_percent,
            timestamp_seconds,
        })?;

        let pending = self.temperature.len();
        info!(
            "collected sample {pending}/{}: temperature={:.1}C humidity={:.1}%",
            self.temperature.capacity(),
            measurement.temperature_celsius,
            measurement.humidity_percent
        );

        if !(self.temperature.is_full() && self.humidity.is_full()) {
            return Ok(Tick::Collected { pending });
        }

        let batch = Batch::drain(&mut self.temperature, &mut self.humidity)
            .context("failed to assemble batch")?;
        self.sender
            .enqueue(batch)
            .context("failed to enqueue batch")?;
        info!("enqueued batch of {pending} samples");

        Ok(Tick::Flushed)
    }

    /// Samples every `interval` until the queue closes.
    pub fn run(mut self, interval: Duration) -> Result<()> {
        loop {
            self.collect_once()?;
            thread::sleep(interval);
        }
    }
}
