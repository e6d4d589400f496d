//! Event emitter boundary and payloads

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::WorkerError;
use crate::models::outcome::CapturedLogs;

/// Numeric event kind on the wire: 2 = success, 3 = failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Success,
    Failure,
}

impl EventKind {
    pub fn code(self) -> u8 {
        match self {
            EventKind::Success => 2,
            EventKind::Failure => 3,
        }
    }
}

impl Serialize for EventKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

/// Event data; only successes carry the captured logs
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EventData {
    #[serde(rename_all = "camelCase")]
    Success {
        build_time: f64,
        logs_to_capture: CapturedLogs,
        exit_code: i32,
    },
    #[serde(rename_all = "camelCase")]
    Failure { build_time: f64, exit_code: i32 },
}

/// Payload published to the deployment channel
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub data: EventData,
}

impl DeploymentEvent {
    pub fn success(build_time: f64, logs_to_capture: CapturedLogs, exit_code: i32) -> Self {
        Self {
            kind: EventKind::Success,
            data: EventData::Success {
                build_time,
                logs_to_capture,
                exit_code,
            },
        }
    }

    pub fn failure(build_time: f64, exit_code: i32) -> Self {
        Self {
            kind: EventKind::Failure,
            data: EventData::Failure {
                build_time,
                exit_code,
            },
        }
    }
}

/// Pub/sub boundary for deployment events
#[async_trait]
pub trait EventEmitter: Send + Sync {
    async fn publish(&self, channel: &str, event: &DeploymentEvent) -> Result<(), WorkerError>;
}
