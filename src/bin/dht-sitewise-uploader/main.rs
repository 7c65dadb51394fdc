mod args;
mod gpio;

use std::{process::ExitCode, time::Duration};

use anyhow::{Context as _, Result, ensure};
use args::Args;
use clap::Parser as _;
use dht_sitewise::{
    clock::SystemClock,
    dht::ProtocolDecoder,
    pipeline::{SampleCollector, Uploader, telemetry_queue},
    sitewise::{
        Channel, Credentials, HttpTransport, SigV4Signer, SiteWiseEndpoint, SiteWiseJsonEncoder,
    },
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::gpio::open_sensor_pin;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = run().await {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    let args = Args::parse();

    init_logging();

    ensure!(
        args.channel_capacity > 0,
        "channel capacity must be at least 1"
    );

    let (sender, receiver) =
        telemetry_queue(args.queue_capacity).context("failed to create telemetry queue")?;

    let pin = open_sensor_pin(&args.gpio_chip, args.gpio_line)
        .context("failed to open sensor pin")?;

    let collector = SampleCollector::new(
        ProtocolDecoder::new(pin),
        args.sensor_family,
        Channel::new(
            &args.asset_id,
            &args.temperature_property_id,
            args.channel_capacity,
        ),
        Channel::new(
            &args.asset_id,
            &args.humidity_property_id,
            args.channel_capacity,
        ),
        sender,
        SystemClock,
    );

    let endpoint = SiteWiseEndpoint::new(&args.region);
    let credentials = Credentials {
        access_key_id: args.access_key_id,
        secret_access_key: args.secret_access_key,
    };
    let transport = HttpTransport::new(&endpoint).context("failed to create HTTP transport")?;
    let uploader = Uploader::new(
        receiver,
        SiteWiseJsonEncoder,
        SigV4Signer::new(credentials, endpoint),
        transport,
        SystemClock,
    );

    info!(
        "sampling {} on {} line {} every {}s",
        args.sensor_family,
        args.gpio_chip.display(),
        args.gpio_line,
        args.interval_secs
    );

    let interval = Duration::from_secs(args.interval_secs);
    let sampler = tokio::task::spawn_blocking(move || collector.run(interval));

    uploader.run().await;

    sampler
        .await
        .context("sampling thread panicked")?
        .context("sampling stopped")
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}
