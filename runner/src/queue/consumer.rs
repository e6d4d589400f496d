//! Single-shot queue consumer

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::errors::WorkerError;
use crate::queue::source::QueueSource;
use crate::queue::QueueMessage;

/// Handles the one message this consumer will ever deliver
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, message: &QueueMessage) -> Result<(), WorkerError>;
}

/// Lifecycle signals raised around message handling
#[async_trait]
pub trait LifecycleEvents: Send + Sync {
    /// A message was pulled; polling is already stopped when this fires
    async fn message_received(&self, message: &QueueMessage);

    /// The handler returned successfully and the message was acknowledged
    async fn message_processed(&self, message: &QueueMessage);

    /// The handler raised after taking the message
    async fn processing_error(&self, err: &WorkerError);

    /// The transport failed outside of message handling
    async fn transport_error(&self, err: &WorkerError);
}

/// Consumer options
#[derive(Debug, Clone)]
pub struct Options {
    /// Delay between empty polls
    pub poll_delay: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            poll_delay: Duration::from_secs(1),
        }
    }
}

/// Pulls messages one at a time and hands them to the job handler.
///
/// The consumer stops its own polling the moment a message is pulled: this
/// process owns exactly one job for its entire remaining life, so a second
/// message must never be fetched.
pub struct Consumer {
    source: Arc<dyn QueueSource>,
    handler: Arc<dyn JobHandler>,
    events: Arc<dyn LifecycleEvents>,
    options: Options,
    stopped: AtomicBool,
}

impl Consumer {
    pub fn new(
        source: Arc<dyn QueueSource>,
        handler: Arc<dyn JobHandler>,
        events: Arc<dyn LifecycleEvents>,
        options: Options,
    ) -> Self {
        Self {
            source,
            handler,
            events,
            options,
            stopped: AtomicBool::new(false),
        }
    }

    /// Stop polling; an in-flight handler still runs to completion
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Poll until one message has been handled, then return.
    ///
    /// Handler and transport failures are returned to the caller, which
    /// decides process fate; for this worker they are fatal.
    pub async fn run(&self) -> Result<(), WorkerError> {
        info!("Consumer polling for the deployment job...");

        loop {
            if self.is_stopped() {
                info!("Consumer stopped before a message arrived");
                return Ok(());
            }

            let message = match self.source.receive().await {
                Ok(Some(message)) => message,
                Ok(None) => {
                    debug!("Queue poll window elapsed empty");
                    tokio::time::sleep(self.options.poll_delay).await;
                    continue;
                }
                Err(err) => {
                    self.events.transport_error(&err).await;
                    return Err(err);
                }
            };

            // Single-message intake: no further polling from here on.
            self.stop();
            self.events.message_received(&message).await;

            if let Err(err) = self.handler.handle(&message).await {
                self.events.processing_error(&err).await;
                return Err(err);
            }

            if let Err(err) = self.source.ack(&message).await {
                self.events.transport_error(&err).await;
                return Err(err);
            }

            self.events.message_processed(&message).await;
            return Ok(());
        }
    }
}
