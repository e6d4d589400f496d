//! Deployment runner - Entry Point
//!
//! A single-shot deployment worker: one container, one queue message, one
//! deployment. Once the job is done the runner flips its desired state so
//! the host orchestrator recycles the container.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use deploy_runner::app::options::AppOptions;
use deploy_runner::app::run::run;
use deploy_runner::deploy::process;
use deploy_runner::events::mqtt::BrokerAddress;
use deploy_runner::logs::{init_logging, LogOptions};
use deploy_runner::queue::{consumer, transport};
use deploy_runner::settings::Settings;
use deploy_runner::task::task_id_from_metadata;
use deploy_runner::utils::version_info;

use tracing::{error, info};

/// Env var the orchestrator sets to this container's metadata URI
const METADATA_URI_ENV: &str = "CONTAINER_METADATA_URI";

const DEFAULT_SETTINGS_PATH: &str = "/etc/deploy-runner/settings.json";

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    if cli_args.contains_key("version") {
        println!("{}", serde_json::to_string_pretty(&version_info()).unwrap());
        return;
    }

    // Retrieve the settings file
    let settings_path = cli_args
        .get("config")
        .map(String::as_str)
        .unwrap_or(DEFAULT_SETTINGS_PATH);
    let settings = match Settings::load(settings_path).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Unable to read settings file {settings_path}: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        ..Default::default()
    };
    if let Err(e) = init_logging(log_options) {
        println!("Failed to initialize logging: {e}");
    }

    // Task identity comes from the container the orchestrator put us in
    let task_id = match env::var(METADATA_URI_ENV)
        .ok()
        .as_deref()
        .and_then(task_id_from_metadata)
    {
        Some(id) => id,
        None => {
            error!("{METADATA_URI_ENV} is not set or carries no container identity");
            std::process::exit(1);
        }
    };

    let options = AppOptions {
        task_id,
        state_dir: settings.state_dir.clone(),
        hosting_base_url: settings.hosting_api.base_url.clone(),
        payment_base_url: settings.payment_api.base_url.clone(),
        queue: transport::Options {
            base_url: settings.queue.base_url.clone(),
            queue_name: settings.queue.name.clone(),
            wait: Duration::from_secs(settings.queue.wait_secs),
        },
        consumer: consumer::Options {
            poll_delay: Duration::from_secs(settings.queue.poll_delay_secs),
        },
        broker: BrokerAddress {
            host: settings.broker.host.clone(),
            port: settings.broker.port,
            use_tls: settings.broker.tls,
            ca_cert_path: settings.broker.ca_cert_path.clone(),
        },
        executor: process::Options {
            command: settings.executor.command.clone(),
            args: settings.executor.args.clone(),
            working_dir: settings.executor.working_dir.clone(),
        },
    };

    info!("Running deployment runner with options: {:?}", options);
    if let Err(e) = run(options, await_shutdown_signal()).await {
        error!("Deployment runner failed: {e}");
        std::process::exit(1);
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).unwrap();
        let mut sigint = signal(SignalKind::interrupt()).unwrap();

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
        info!("Ctrl+C received, shutting down...");
    }
}
