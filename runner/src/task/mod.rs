//! Task lifecycle record and identity

pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Observed task state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    Idle,
    Running,
}

/// State the host orchestrator should converge the container to.
///
/// Once STOPPED it is never set back to RUNNING by this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DesiredState {
    Running,
    Stopped,
}

/// Persisted lifecycle record for one worker container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task id derived from the container identity
    pub task_id: String,

    pub state: TaskState,

    pub desired_state: DesiredState,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl TaskRecord {
    /// New record in the startup defaults: idle, desired running
    pub fn new(task_id: &str) -> Self {
        let now = Utc::now();
        Self {
            task_id: task_id.to_string(),
            state: TaskState::Idle,
            desired_state: DesiredState::Running,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Derive the task id from the container metadata URI.
///
/// The orchestrator exposes a per-container metadata endpoint whose last path
/// segment carries the container identity; the task id is the part before the
/// first `-`.
pub fn task_id_from_metadata(metadata_uri: &str) -> Option<String> {
    let last = metadata_uri.trim_end_matches('/').rsplit('/').next()?;
    let id = last.split('-').next().unwrap_or(last);
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
