//! Hosting service client

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::WorkerError;
use crate::http::client::HttpClient;
use crate::models::report::{DeploymentReport, StatusUpdate};

/// Boundary to the hosting service's deployment-log endpoints
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// Mark a deployment's status before the build starts; any 2xx is
    /// accepted and the response is ignored
    async fn change_status(&self, update: &StatusUpdate) -> Result<(), WorkerError>;

    /// Deliver the terminal report; the response is informational only
    async fn deployment_finished(&self, report: &DeploymentReport) -> Result<Value, WorkerError>;
}

/// Hosting service over HTTP
pub struct HttpHostingApi {
    client: HttpClient,
}

impl HttpHostingApi {
    pub fn new(base_url: &str) -> Result<Self, WorkerError> {
        Ok(Self {
            client: HttpClient::new(base_url)?,
        })
    }
}

#[async_trait]
impl HostingApi for HttpHostingApi {
    async fn change_status(&self, update: &StatusUpdate) -> Result<(), WorkerError> {
        self.client.post("/logs/changeStatus", update).await?;
        Ok(())
    }

    async fn deployment_finished(&self, report: &DeploymentReport) -> Result<Value, WorkerError> {
        self.client.post("/logs/finished", report).await
    }
}
