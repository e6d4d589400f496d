//! Executor outcome models

use serde::{Deserialize, Serialize};

/// Structured logs the executor scraped out of the deployment output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedLogs {
    /// Public preview URL of the deployed artifact; empty when none was
    /// captured or the deployment failed
    #[serde(default)]
    pub site_preview: String,

    /// Raw fee descriptor line, e.g. "Total price: 1.50 AR"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Result of one executor invocation
#[derive(Debug, Clone)]
pub struct DeploymentOutcome {
    /// 0 on success, 1 on failure
    pub exit_code: i32,

    /// Combined stdout and stderr of the deployment
    pub process_output: String,

    pub logs_to_capture: CapturedLogs,
}
