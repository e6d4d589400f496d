//! Application configuration options

use std::path::PathBuf;

use crate::deploy::process;
use crate::events::mqtt::BrokerAddress;
use crate::queue::{consumer, transport};

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Identity of the task record this container owns
    pub task_id: String,

    /// Directory holding the persisted task record
    pub state_dir: PathBuf,

    /// Hosting service base URL
    pub hosting_base_url: String,

    /// Payment service base URL
    pub payment_base_url: String,

    /// Queue transport options
    pub queue: transport::Options,

    /// Consumer options
    pub consumer: consumer::Options,

    /// MQTT broker carrying deployment events
    pub broker: BrokerAddress,

    /// Deploy command options
    pub executor: process::Options,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            task_id: "local".to_string(),
            state_dir: PathBuf::from("/var/lib/deploy-runner"),
            hosting_base_url: "http://localhost:4000".to_string(),
            payment_base_url: "http://localhost:4100".to_string(),
            queue: transport::Options::default(),
            consumer: consumer::Options::default(),
            broker: BrokerAddress::default(),
            executor: process::Options::default(),
        }
    }
}
