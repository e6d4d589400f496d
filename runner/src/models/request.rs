//! Deployment request wire model

use serde::{Deserialize, Serialize};

use crate::errors::WorkerError;

/// A deployment job pulled off the shared queue.
///
/// Only the routing and billing fields are modeled here; everything else in
/// the message body is executor payload and passes through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRequest {
    pub deployment_id: String,

    /// Event channel suffix for this deployment
    pub topic: String,

    /// Deployment protocol, e.g. "arweave" or "skynet"
    pub protocol: String,

    #[serde(default)]
    pub wallet_id: String,

    #[serde(default)]
    pub wallet_address: String,

    /// Pre-paid jobs skip the payment call entirely
    #[serde(default)]
    pub paid_via_subscription: bool,

    /// Executor-specific payload, forwarded as-is
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl DeploymentRequest {
    /// Parse a queue message body; done exactly once per job
    pub fn parse(body: &str) -> Result<Self, WorkerError> {
        serde_json::from_str(body).map_err(|e| WorkerError::MalformedRequest(e.to_string()))
    }
}
