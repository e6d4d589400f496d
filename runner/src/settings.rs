//! Settings file management

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::WorkerError;
use crate::logs::LogLevel;

/// Runner settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Hosting service configuration
    #[serde(default)]
    pub hosting_api: HostingApiSettings,

    /// Payment service configuration
    #[serde(default)]
    pub payment_api: PaymentApiSettings,

    /// Deployment queue configuration
    #[serde(default)]
    pub queue: QueueSettings,

    /// MQTT broker carrying deployment events
    #[serde(default)]
    pub broker: BrokerSettings,

    /// Deploy command configuration
    #[serde(default)]
    pub executor: ExecutorSettings,

    /// Directory holding the persisted task record
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("/var/lib/deploy-runner")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            hosting_api: HostingApiSettings::default(),
            payment_api: PaymentApiSettings::default(),
            queue: QueueSettings::default(),
            broker: BrokerSettings::default(),
            executor: ExecutorSettings::default(),
            state_dir: default_state_dir(),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file
    pub async fn load(path: &str) -> Result<Self, WorkerError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Hosting service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostingApiSettings {
    /// Base URL for the hosting service
    #[serde(default = "default_hosting_url")]
    pub base_url: String,
}

fn default_hosting_url() -> String {
    "http://localhost:4000".to_string()
}

impl Default for HostingApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_hosting_url(),
        }
    }
}

/// Payment service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentApiSettings {
    /// Base URL for the payment service
    #[serde(default = "default_payment_url")]
    pub base_url: String,
}

fn default_payment_url() -> String {
    "http://localhost:4100".to_string()
}

impl Default for PaymentApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_payment_url(),
        }
    }
}

/// Deployment queue settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSettings {
    /// Base URL of the queue service
    #[serde(default = "default_queue_url")]
    pub base_url: String,

    /// Queue to pull the deployment job from
    #[serde(default = "default_queue_name")]
    pub name: String,

    /// Long-poll window in seconds
    #[serde(default = "default_wait_secs")]
    pub wait_secs: u64,

    /// Delay between empty polls in seconds
    #[serde(default = "default_poll_delay_secs")]
    pub poll_delay_secs: u64,
}

fn default_queue_url() -> String {
    "http://localhost:9324".to_string()
}

fn default_queue_name() -> String {
    "deployments".to_string()
}

fn default_wait_secs() -> u64 {
    20
}

fn default_poll_delay_secs() -> u64 {
    1
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            base_url: default_queue_url(),
            name: default_queue_name(),
            wait_secs: default_wait_secs(),
            poll_delay_secs: default_poll_delay_secs(),
        }
    }
}

/// MQTT broker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerSettings {
    /// Broker host
    #[serde(default)]
    pub host: String,

    /// Broker port
    #[serde(default = "default_broker_port")]
    pub port: u16,

    /// Use TLS
    #[serde(default = "default_true")]
    pub tls: bool,

    /// Optional path to a PEM-encoded CA certificate for broker TLS
    /// verification. When absent, the system certificate store is used.
    #[serde(default)]
    pub ca_cert_path: Option<String>,
}

fn default_broker_port() -> u16 {
    8883
}

fn default_true() -> bool {
    true
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_broker_port(),
            tls: true,
            ca_cert_path: None,
        }
    }
}

/// Deploy command settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorSettings {
    /// Deploy command to spawn
    #[serde(default = "default_executor_command")]
    pub command: String,

    /// Arguments passed to the deploy command
    #[serde(default)]
    pub args: Vec<String>,

    /// Working directory for the deploy command
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

fn default_executor_command() -> String {
    "deploy-site".to_string()
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            command: default_executor_command(),
            args: Vec::new(),
            working_dir: None,
        }
    }
}
