//! Completion report wire models

use serde::{Deserialize, Serialize};

use crate::models::outcome::CapturedLogs;

/// Terminal verdict for one deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentStatus {
    Deployed,
    Failed,
}

/// Body of the finished call to the hosting service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentReport {
    pub deployment_status: DeploymentStatus,

    /// Full deploy output; empty when the job never produced any
    pub logs: String,

    pub logs_to_capture: CapturedLogs,

    pub task_id: String,

    /// Absent only when the message body could not be parsed at all
    pub deployment_id: Option<String>,

    /// Wall-clock seconds spent inside the executor; 0 when it never ran
    pub build_time: f64,
}

/// Status-change body for the hosting service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub deployment_id: String,
    pub status: String,
}

impl StatusUpdate {
    /// The "Pending" notification sent before the executor runs
    pub fn pending(deployment_id: &str) -> Self {
        Self {
            deployment_id: deployment_id.to_string(),
            status: "Pending".to_string(),
        }
    }
}
