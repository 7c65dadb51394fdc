use std::{fmt, str::FromStr};

use anyhow::{Error, bail};

use crate::dht::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFamily {
    Dht11,
    Dht22,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
}

impl SensorFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorFamily::Dht11 => "dht11",
            SensorFamily::Dht22 => "dht22",
        }
    }

    pub fn decode(&self, frame: &Frame) -> Measurement {
        match self {
            SensorFamily::Dht11 => decode_dht11_frame(frame),
            SensorFamily::Dht22 => decode_dht22_frame(frame),
        }
    }
}

impl fmt::Display for SensorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dht11" => Ok(SensorFamily::Dht11),
            "dht22" | "am2302" => Ok(SensorFamily::Dht22),
            _ => bail!("unknown sensor family: {}", s),
        }
    }
}

// Integral and decimal bytes; bit 7 of the temperature decimal byte flags
// sub-zero readings.
fn decode_dht11_frame(frame: &Frame) -> Measurement {
    let humidity_percent =
        f64::from(frame.humidity_high()) + f64::from(frame.humidity_low()) / 10f64;

    let mut temperature_celsius = f64::from(frame.temperature_high());
    if frame.temperature_low() & 0x80 != 0 {
        temperature_celsius = -1f64 - temperature_celsius;
    }
    temperature_celsius += f64::from(frame.temperature_low() & 0x0f) / 10f64;

    Measurement {
        temperature_celsius,
        humidity_percent,
    }
}

// Big-endian tenths; bit 7 of the temperature high byte is a sign flag, not
// two's complement.
fn decode_dht22_frame(frame: &Frame) -> Measurement {
    let humidity_raw = u16::from_be_bytes([frame.humidity_high(), frame.humidity_low()]);
    let humidity_percent = f64::from(humidity_raw) / 10f64;

    let temperature_raw =
        u16::from_be_bytes([frame.temperature_high() & 0x7f, frame.temperature_low()]);
    let mut temperature_celsius = f64::from(temperature_raw) / 10f64;
    if frame.temperature_high() & 0x80 != 0 {
        temperature_celsius = -temperature_celsius;
    }

    Measurement {
        temperature_celsius,
        humidity_percent,
    }
}
