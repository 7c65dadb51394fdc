use anyhow::{Context as _, Result};
use tracing::{debug, error, info, warn};

use crate::{
    clock::Clock,
    pipeline::BatchReceiver,
    sitewise::{Batch, Encoder, Signer, Transport, TransportResponse},
};

/// Drains the telemetry queue, sending each batch once.
pub struct Uploader<E, S, T, C> {
    receiver: BatchReceiver,
    encoder: E,
    signer: S,
    transport: T,
    clock: C,
}

impl<E, S, T, C> Uploader<E, S, T, C>
where
    E: Encoder,
    S: Signer,
    T: Transport,
    C: Clock,
{
    pub fn new(receiver: BatchReceiver, encoder: E, signer: S, transport: T, clock: C) -> Self {
        Self {
            receiver,
            encoder,
            signer,
            transport,
            clock,
        }
    }

    /// Runs until the queue is closed and empty. A batch whose upload fails
    /// is dropped.
    pub async fn run(mut self) {
        while let Some(batch) = self.receiver.dequeue().await {
            info!("dequeued batch of {} samples, sending to SiteWise", batch.len());

            match self.upload(&batch).await {
                Ok(response) if response.is_success() => {
                    info!("HTTP POST status = {}", response.status);
                    debug!("response body: {}", response.body);
                }
                Ok(response) => {
                    warn!(
                        "SiteWise rejected batch, discarding: status = {}, body = {}",
                        response.status, response.body
                    );
                }
                Err(err) => {
                    error!("failed to upload batch, discarding: {err:#}");
                }
            }
        }

        info!("telemetry queue closed, uploader stopping");
    }

    pub async fn upload(&self, batch: &Batch) -> Result<TransportResponse> {
        let payload = self
            .encoder
            .encode(batch)
            .context("failed to encode batch")?;

        let headers = self
            .signer
            .sign(&payload, self.clock.now())
            .context("failed to sign request")?;

        self.transport
            .send(payload, &headers)
            .await
            .context("failed to send batch")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use anyhow::bail;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::{
        pipeline::telemetry_queue,
        sitewise::{Channel, Headers, Reading},
    };

    fn batch(marker: i64) -> Batch {
        let mut temperature = Channel::new("asset", "t", 1);
        let mut humidity = Channel::new("asset", "h", 1);
        let reading = Reading {
            value: marker as f64,
            timestamp_seconds: marker,
        };
        temperature.push(reading).unwrap();
        humidity.push(reading).unwrap();
        Batch::drain(&mut temperature, &mut humidity).unwrap()
    }

    struct MarkerEncoder;

    impl Encoder for MarkerEncoder {
        fn encode(&self, batch: &Batch) -> Result<Vec<u8>> {
            let marker = batch.temperature().readings()[0].timestamp_seconds;
            if marker < 0 {
                bail!("unencodable batch {marker}");
            }
            Ok(marker.to_string().into_bytes())
        }
    }

    struct EchoSigner;

    impl Signer for EchoSigner {
        fn sign(&self, payload: &[u8], timestamp: DateTime<Utc>) -> Result<Headers> {
            Ok(vec![(
                "x-signed".to_string(),
                format!("{}@{}", String::from_utf8_lossy(payload), timestamp.timestamp()),
            )])
        }
    }

    #[derive(Clone, Default)]
    struct RecordingTransport {
        sent: Arc<Mutex<Vec<(String, Headers)>>>,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(
            &self,
            payload: Vec<u8>,
            headers: &[(String, String)],
        ) -> Result<TransportResponse> {
            let body = String::from_utf8(payload)?;
            self.sent
                .lock()
                .unwrap()
                .push((body.clone(), headers.to_vec()));

            match body.as_str() {
                "13" => bail!("connection reset"),
                "14" => Ok(TransportResponse {
                    status: 403,
                    body: "forbidden".to_string(),
                }),
                _ => Ok(TransportResponse {
                    status: 200,
                    body: "{}".to_string(),
                }),
            }
        }
    }

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            DateTime::from_timestamp(1_760_000_000, 0).unwrap()
        }
    }

    #[tokio::test]
    async fn failures_do_not_block_later_batches() {
        let (sender, receiver) = telemetry_queue(10).unwrap();
        let transport = RecordingTransport::default();
        let uploader = Uploader::new(
            receiver,
            MarkerEncoder,
            EchoSigner,
            transport.clone(),
            FixedClock,
        );

        tokio::task::spawn_blocking(move || {
            for marker in [10, -1, 13, 14, 15] {
                sender.enqueue(batch(marker)).unwrap();
            }
        })
        .await
        .unwrap();

        uploader.run().await;

        let sent = transport.sent.lock().unwrap();
        let bodies: Vec<&str> = sent.iter().map(|(b, _)| b.as_str()).collect();
        assert_eq!(bodies, vec!["10", "13", "14", "15"]);
        assert_eq!(
            sent[0].1,
            vec![("x-signed".to_string(), "10@1760000000".to_string())]
        );
    }

    #[tokio::test]
    async fn upload_reports_each_stage() {
        let (_sender, receiver) = telemetry_queue(1).unwrap();
        let uploader = Uploader::new(
            receiver,
            MarkerEncoder,
            EchoSigner,
            RecordingTransport::default(),
            FixedClock,
        );

        let err = uploader.upload(&batch(-1)).await.unwrap_err();
        assert_eq!(err.to_string(), "failed to encode batch");

        let err = uploader.upload(&batch(13)).await.unwrap_err();
        assert_eq!(format!("{err:#}"), "failed to send batch: connection reset");

        let response = uploader.upload(&batch(14)).await.unwrap();
        assert!(!response.is_success());
    }
}
