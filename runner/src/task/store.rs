//! Task state persistence

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::errors::WorkerError;
use crate::task::{DesiredState, TaskRecord, TaskState};

/// Store for the per-container task record, keyed by task id
#[async_trait]
pub trait TaskStateStore: Send + Sync {
    /// Create or replace the record
    async fn upsert(&self, record: &TaskRecord) -> Result<(), WorkerError>;

    /// Load the record if present
    async fn load(&self, task_id: &str) -> Result<Option<TaskRecord>, WorkerError>;

    /// Update the observed state
    async fn set_state(&self, task_id: &str, state: TaskState) -> Result<(), WorkerError>;

    /// Update the desired state read by the host orchestrator
    async fn set_desired_state(
        &self,
        task_id: &str,
        desired: DesiredState,
    ) -> Result<(), WorkerError>;
}

/// File-backed store writing one JSON record per task
pub struct FileTaskStore {
    state_dir: PathBuf,
}

impl FileTaskStore {
    pub fn new(state_dir: PathBuf) -> Self {
        Self { state_dir }
    }

    fn record_path(&self, task_id: &str) -> PathBuf {
        self.state_dir.join(format!("{task_id}.json"))
    }

    async fn read(&self, task_id: &str) -> Result<Option<TaskRecord>, WorkerError> {
        let path = self.record_path(task_id);
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(WorkerError::StoreError(format!(
                "read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn write(&self, record: &TaskRecord) -> Result<(), WorkerError> {
        tokio::fs::create_dir_all(&self.state_dir)
            .await
            .map_err(|e| {
                WorkerError::StoreError(format!("create {}: {e}", self.state_dir.display()))
            })?;

        let path = self.record_path(&record.task_id);
        let raw = serde_json::to_string_pretty(record)?;
        tokio::fs::write(&path, raw).await.map_err(|e| {
            WorkerError::StoreError(format!("write {}: {e}", path.display()))
        })?;

        debug!("Task record written: {}", path.display());
        Ok(())
    }

    async fn update<F>(&self, task_id: &str, apply: F) -> Result<(), WorkerError>
    where
        F: FnOnce(&mut TaskRecord) + Send,
    {
        let mut record = self.read(task_id).await?.ok_or_else(|| {
            WorkerError::StoreError(format!("no task record for {task_id}"))
        })?;
        apply(&mut record);
        record.updated_at = Utc::now();
        self.write(&record).await
    }
}

#[async_trait]
impl TaskStateStore for FileTaskStore {
    async fn upsert(&self, record: &TaskRecord) -> Result<(), WorkerError> {
        self.write(record).await
    }

    async fn load(&self, task_id: &str) -> Result<Option<TaskRecord>, WorkerError> {
        self.read(task_id).await
    }

    async fn set_state(&self, task_id: &str, state: TaskState) -> Result<(), WorkerError> {
        self.update(task_id, |record| record.state = state).await
    }

    async fn set_desired_state(
        &self,
        task_id: &str,
        desired: DesiredState,
    ) -> Result<(), WorkerError> {
        self.update(task_id, |record| record.desired_state = desired)
            .await
    }
}
