mod args;
mod csv;

use std::fs::File;

use anyhow::Context as _;
use args::Args;
use clap::Parser as _;
use dht_sitewise::dht::{ProtocolDecoder, SimulatedSensor};

use crate::csv::read_line_trace;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let file =
        File::open(&args.file).with_context(|| format!("failed to open file: {:?}", args.file))?;
    let trace = read_line_trace(file).context("failed to read line trace")?;

    let mut decoder = ProtocolDecoder::new(SimulatedSensor::new([trace]));
    let frame = decoder
        .decode()
        .with_context(|| format!("failed to decode {:?}", args.file))?;
    let measurement = args.sensor_family.decode(&frame);

    println!("frame: {:02x?}", frame.as_bytes());
    println!(
        "{}: temperature {:.1}C, humidity {:.1}%",
        args.sensor_family, measurement.temperature_celsius, measurement.humidity_percent
    );

    Ok(())
}
