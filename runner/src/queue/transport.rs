//! HTTP long-poll queue transport

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::WorkerError;
use crate::http::client::HttpClient;
use crate::queue::source::QueueSource;
use crate::queue::QueueMessage;

/// Queue transport options
#[derive(Debug, Clone)]
pub struct Options {
    /// Base URL of the queue service
    pub base_url: String,

    /// Queue to pull the deployment job from
    pub queue_name: String,

    /// Long-poll window requested from the queue service
    pub wait: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9324".to_string(),
            queue_name: "deployments".to_string(),
            wait: Duration::from_secs(20),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReceiveBody {
    max_messages: u32,
    wait_seconds: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReceiveResponse {
    #[serde(default)]
    messages: Vec<WireMessage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMessage {
    message_id: String,
    receipt_handle: String,
    body: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AckBody<'a> {
    receipt_handle: &'a str,
}

/// Queue source long-polling the queue service over HTTP
pub struct HttpQueueSource {
    client: HttpClient,
    options: Options,
}

impl HttpQueueSource {
    pub fn new(options: Options) -> Result<Self, WorkerError> {
        let client = HttpClient::new(&options.base_url)?;
        Ok(Self { client, options })
    }
}

#[async_trait]
impl QueueSource for HttpQueueSource {
    async fn receive(&self) -> Result<Option<QueueMessage>, WorkerError> {
        let path = format!("/queues/{}/receive", self.options.queue_name);
        let body = ReceiveBody {
            max_messages: 1,
            wait_seconds: self.options.wait.as_secs(),
        };

        let response: ReceiveResponse = self
            .client
            .post_json(&path, &body)
            .await
            .map_err(|e| WorkerError::TransportError(e.to_string()))?;

        Ok(response.messages.into_iter().next().map(|m| QueueMessage {
            id: m.message_id,
            receipt: m.receipt_handle,
            body: m.body,
        }))
    }

    async fn ack(&self, message: &QueueMessage) -> Result<(), WorkerError> {
        let path = format!("/queues/{}/ack", self.options.queue_name);
        self.client
            .post(
                &path,
                &AckBody {
                    receipt_handle: &message.receipt,
                },
            )
            .await
            .map_err(|e| WorkerError::TransportError(e.to_string()))?;

        debug!("Acknowledged message {}", message.id);
        Ok(())
    }
}
