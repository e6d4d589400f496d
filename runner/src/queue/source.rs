//! Queue transport boundary

use async_trait::async_trait;

use crate::errors::WorkerError;
use crate::queue::QueueMessage;

/// Transport the consumer pulls messages from
#[async_trait]
pub trait QueueSource: Send + Sync {
    /// Long-poll for the next message; `None` when the poll window elapsed
    /// without one
    async fn receive(&self) -> Result<Option<QueueMessage>, WorkerError>;

    /// Acknowledge a handled message so the queue drops it
    async fn ack(&self, message: &QueueMessage) -> Result<(), WorkerError>;
}
