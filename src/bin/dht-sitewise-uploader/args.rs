use std::path::PathBuf;

use clap::Parser;
use dht_sitewise::{
    dht::SensorFamily,
    pipeline::DEFAULT_QUEUE_CAPACITY,
    sitewise::DEFAULT_CHANNEL_CAPACITY,
};

#[derive(Debug, Parser)]
pub struct Args {
    #[arg(long, env = "DHT_GPIO_CHIP", default_value = "/dev/gpiochip0")]
    pub gpio_chip: PathBuf,

    #[arg(long, env = "DHT_GPIO_LINE")]
    pub gpio_line: u32,

    #[arg(long, env = "DHT_SENSOR_FAMILY", default_value = "dht22")]
    pub sensor_family: SensorFamily,

    #[arg(long, env = "SITEWISE_ASSET_ID")]
    pub asset_id: String,

    #[arg(long, env = "SITEWISE_TEMPERATURE_PROPERTY_ID")]
    pub temperature_property_id: String,

    #[arg(long, env = "SITEWISE_HUMIDITY_PROPERTY_ID")]
    pub humidity_property_id: String,

    #[arg(long, env = "MEASUREMENT_INTERVAL_SECS", default_value_t = 5)]
    pub interval_secs: u64,

    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    #[arg(long, default_value_t = DEFAULT_CHANNEL_CAPACITY)]
    pub channel_capacity: usize,

    #[arg(long, env = "AWS_REGION")]
    pub region: String,

    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    pub access_key_id: String,

    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_access_key: String,
}
