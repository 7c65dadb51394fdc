use anyhow::{Result, anyhow, ensure};
use tokio::sync::mpsc;

use crate::sitewise::Batch;

pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Creates the bounded FIFO that carries completed batches from the sampling
/// thread to the uploader task.
pub fn telemetry_queue(capacity: usize) -> Result<(BatchSender, BatchReceiver)> {
    ensure!(capacity > 0, "telemetry queue capacity must be at least 1");

    let (tx, rx) = mpsc::channel(capacity);

    Ok((BatchSender(tx), BatchReceiver(rx)))
}

#[derive(Debug, Clone)]
pub struct BatchSender(mpsc::Sender<Batch>);

impl BatchSender {
    /// Blocks the calling thread until a slot is free.
    ///
    /// There is no timeout: a stalled uploader stalls sampling. Must not be
    /// called from async code.
    pub fn enqueue(&self, batch: Batch) -> Result<()> {
        self.0
            .blocking_send(batch)
            .map_err(|_| anyhow!("telemetry queue closed"))
    }
}

#[derive(Debug)]
pub struct BatchReceiver(mpsc::Receiver<Batch>);

impl BatchReceiver {
    /// Waits for the oldest batch. `None` once every sender is gone and the
    /// queue is drained.
    pub async fn dequeue(&mut self) -> Option<Batch> {
        self.0.recv().await
    }
}
