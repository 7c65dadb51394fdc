use std::path::Path;

use anyhow::{Context as _, Result};
use dht_sitewise::dht::{OpenDrainPin, SpinDelay};
use linux_embedded_hal::{
    CdevPin,
    gpio_cdev::{Chip, LineRequestFlags},
};

const CONSUMER: &str = "dht-sitewise";

pub fn open_sensor_pin(chip: &Path, line: u32) -> Result<OpenDrainPin<CdevPin, SpinDelay>> {
    let mut chip =
        Chip::new(chip).with_context(|| format!("failed to open GPIO chip: {}", chip.display()))?;

    let handle = chip
        .get_line(line)
        .with_context(|| format!("failed to get GPIO line: {line}"))?
        .request(
            LineRequestFlags::OUTPUT | LineRequestFlags::OPEN_DRAIN,
            1,
            CONSUMER,
        )
        .with_context(|| format!("failed to request GPIO line: {line}"))?;

    let pin = CdevPin::new(handle).context("failed to create GPIO pin")?;

    Ok(OpenDrainPin::new(pin, SpinDelay))
}
