//! Payment service client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::WorkerError;
use crate::http::client::HttpClient;
use crate::models::outcome::CapturedLogs;

/// Billing call body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub build_time: f64,

    pub wallet_id: String,

    pub wallet_address: String,

    pub deployment_id: String,

    /// False for failed deployments; the call is still made so the payment
    /// service sees every unsubscribed job
    pub should_charge_fee: bool,

    /// Deployment protocol the fee applies to
    pub provider: String,

    /// Fee amount as a decimal string, "0" when nothing was captured
    pub fee: String,

    pub captured_logs: CapturedLogs,

    pub topic: String,
}

/// Boundary to the payment service
#[async_trait]
pub trait PaymentApi: Send + Sync {
    /// Trigger settlement for one deployment; the response is logged only
    async fn trigger(&self, request: &PaymentRequest) -> Result<Value, WorkerError>;
}

/// Payment service over HTTP
pub struct HttpPaymentApi {
    client: HttpClient,
}

impl HttpPaymentApi {
    pub fn new(base_url: &str) -> Result<Self, WorkerError> {
        Ok(Self {
            client: HttpClient::new(base_url)?,
        })
    }
}

#[async_trait]
impl PaymentApi for HttpPaymentApi {
    async fn trigger(&self, request: &PaymentRequest) -> Result<Value, WorkerError> {
        self.client.post("/payments", request).await
    }
}
