//! Deployment executor boundary

use async_trait::async_trait;

use crate::errors::WorkerError;
use crate::models::outcome::DeploymentOutcome;
use crate::models::request::DeploymentRequest;

/// Boundary to the machinery that actually performs a deployment.
///
/// Implementations return `Err` only for infrastructure failures; a
/// deployment that ran and failed is still an outcome, with `exit_code = 1`.
#[async_trait]
pub trait DeploymentExecutor: Send + Sync {
    async fn execute(&self, request: &DeploymentRequest) -> Result<DeploymentOutcome, WorkerError>;
}
