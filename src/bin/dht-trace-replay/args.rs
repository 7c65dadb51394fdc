use std::path::PathBuf;

use clap::Parser;
use dht_sitewise::dht::SensorFamily;

#[derive(Debug, Parser)]
pub struct Args {
    #[arg(long)]
    pub file: PathBuf,

    #[arg(long, default_value = "dht22")]
    pub sensor_family: SensorFamily,
}
