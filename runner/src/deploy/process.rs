//! Process-spawning deployment executor

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;
use tracing::{debug, info};

use crate::deploy::executor::DeploymentExecutor;
use crate::errors::WorkerError;
use crate::models::outcome::{CapturedLogs, DeploymentOutcome};
use crate::models::request::DeploymentRequest;

/// Env var carrying the request JSON into the deploy command
pub const REQUEST_ENV: &str = "DEPLOYMENT_REQUEST";

/// Process executor options
#[derive(Debug, Clone)]
pub struct Options {
    /// Deploy command to spawn
    pub command: String,

    /// Arguments passed to the deploy command
    pub args: Vec<String>,

    /// Working directory for the deploy command
    pub working_dir: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            command: "deploy-site".to_string(),
            args: Vec::new(),
            working_dir: None,
        }
    }
}

/// Executor that runs the configured deploy command and scrapes its output
pub struct ProcessExecutor {
    options: Options,
}

impl ProcessExecutor {
    pub fn new(options: Options) -> Self {
        Self { options }
    }
}

#[async_trait]
impl DeploymentExecutor for ProcessExecutor {
    async fn execute(&self, request: &DeploymentRequest) -> Result<DeploymentOutcome, WorkerError> {
        let request_json = serde_json::to_string(request)?;

        info!(
            "Spawning deploy command {} for deployment {}",
            self.options.command, request.deployment_id
        );

        let mut command = Command::new(&self.options.command);
        command
            .args(&self.options.args)
            .env(REQUEST_ENV, request_json)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.options.working_dir {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|e| {
            WorkerError::ExecutorError(format!("failed to spawn {}: {e}", self.options.command))
        })?;

        // The controller only distinguishes success from failure.
        let exit_code = if output.status.success() { 0 } else { 1 };

        let mut process_output = String::from_utf8_lossy(&output.stdout).into_owned();
        process_output.push_str(&String::from_utf8_lossy(&output.stderr));

        let logs_to_capture = scrape_captured_logs(&process_output);
        debug!(
            "Deploy command exited {} with {} bytes of output",
            exit_code,
            process_output.len()
        );

        Ok(DeploymentOutcome {
            exit_code,
            process_output,
            logs_to_capture,
        })
    }
}

/// Pull the preview link and the fee line out of the deploy output
pub fn scrape_captured_logs(output: &str) -> CapturedLogs {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    let url_re = URL_RE.get_or_init(|| Regex::new(r#"https?://[^\s"']+"#).unwrap());

    let site_preview = url_re
        .find(output)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let fee = output
        .lines()
        .find(|line| line.contains("Total price:"))
        .map(|line| line.trim().to_string());

    CapturedLogs {
        site_preview,
        fee,
        extra: Default::default(),
    }
}
