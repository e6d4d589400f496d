//! MQTT event transport

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rumqttc::{AsyncClient, MqttOptions, QoS};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::WorkerError;
use crate::events::emitter::{DeploymentEvent, EventEmitter};

/// MQTT broker address
#[derive(Debug, Clone)]
pub struct BrokerAddress {
    pub host: String,
    pub port: u16,
    pub use_tls: bool,
    /// Optional path to a PEM-encoded CA certificate for broker verification.
    /// When `None` and `use_tls` is `true`, the system certificate store is
    /// used.
    pub ca_cert_path: Option<String>,
}

impl Default for BrokerAddress {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 8883,
            use_tls: true,
            ca_cert_path: None,
        }
    }
}

/// Emitter publishing deployment events over MQTT
pub struct MqttEmitter {
    client: AsyncClient,
}

impl MqttEmitter {
    /// Connect to the broker and spawn the event-loop driver task
    pub fn connect(
        address: &BrokerAddress,
        client_id: &str,
    ) -> Result<(Self, JoinHandle<()>), WorkerError> {
        if address.host.is_empty() {
            return Err(WorkerError::ConfigError(
                "MQTT host is not configured".to_string(),
            ));
        }

        let mut options = MqttOptions::new(client_id, &address.host, address.port);
        options.set_keep_alive(Duration::from_secs(30));

        if address.use_tls {
            use rumqttc::{TlsConfiguration, Transport};
            use rustls::ClientConfig;

            let mut roots = rustls::RootCertStore::empty();

            if let Some(ref ca_path) = address.ca_cert_path {
                let ca_pem = std::fs::read(ca_path).map_err(|e| {
                    WorkerError::ConfigError(format!("Failed to read CA cert {ca_path}: {e}"))
                })?;
                let mut cursor = std::io::Cursor::new(ca_pem);
                for cert in rustls_pemfile::certs(&mut cursor).flatten() {
                    let _ = roots.add(cert);
                }
            } else {
                for cert in rustls_native_certs::load_native_certs().unwrap_or_default() {
                    let _ = roots.add(cert);
                }
            }

            let tls_config = ClientConfig::builder()
                .with_root_certificates(roots)
                .with_no_client_auth();

            options.set_transport(Transport::tls_with_config(TlsConfiguration::Rustls(
                Arc::new(tls_config),
            )));
        }

        let (client, mut eventloop) = AsyncClient::new(options, 10);

        let driver = tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(_) => {}
                    Err(e) => {
                        warn!("MQTT connection error: {}, retrying...", e);
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                }
            }
        });

        info!(
            "MQTT emitter connected to {}:{}",
            address.host, address.port
        );
        Ok((Self { client }, driver))
    }
}

#[async_trait]
impl EventEmitter for MqttEmitter {
    async fn publish(&self, channel: &str, event: &DeploymentEvent) -> Result<(), WorkerError> {
        let payload =
            serde_json::to_vec(event).map_err(|e| WorkerError::EventError(e.to_string()))?;

        self.client
            .publish(channel, QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|e| WorkerError::EventError(e.to_string()))?;

        debug!("Published deployment event to {}", channel);
        Ok(())
    }
}
