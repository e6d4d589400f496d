//! Message-driven task lifecycle controller

pub mod billing;
pub mod classify;
pub mod fsm;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::controller::billing::extract_fee;
use crate::controller::classify::classify;
use crate::controller::fsm::{JobFsm, JobPhase};
use crate::deploy::executor::DeploymentExecutor;
use crate::errors::WorkerError;
use crate::events::channels;
use crate::events::emitter::{DeploymentEvent, EventEmitter};
use crate::http::hosting::HostingApi;
use crate::http::payment::{PaymentApi, PaymentRequest};
use crate::models::outcome::CapturedLogs;
use crate::models::report::{DeploymentReport, DeploymentStatus, StatusUpdate};
use crate::models::request::DeploymentRequest;
use crate::queue::consumer::{JobHandler, LifecycleEvents};
use crate::queue::QueueMessage;
use crate::task::store::TaskStateStore;
use crate::task::{DesiredState, TaskState};

/// A job-scoped failure with whatever identity could be recovered for it
struct JobFailure {
    deployment_id: Option<String>,
    source: WorkerError,
}

/// Drives one deployment job end to end: queue message in, classified
/// outcome out, task record flipped to stopped.
pub struct TaskController {
    task_id: String,
    store: Arc<dyn TaskStateStore>,
    executor: Arc<dyn DeploymentExecutor>,
    hosting: Arc<dyn HostingApi>,
    payment: Arc<dyn PaymentApi>,
    events: Arc<dyn EventEmitter>,
}

impl TaskController {
    pub fn new(
        task_id: String,
        store: Arc<dyn TaskStateStore>,
        executor: Arc<dyn DeploymentExecutor>,
        hosting: Arc<dyn HostingApi>,
        payment: Arc<dyn PaymentApi>,
        events: Arc<dyn EventEmitter>,
    ) -> Self {
        Self {
            task_id,
            store,
            executor,
            hosting,
            payment,
            events,
        }
    }

    /// Process the single message this container lives for.
    ///
    /// Job-scoped failures are contained here: flipped desired state, failure
    /// report, no payment — and never propagated, so the queue client always
    /// observes a successful handler.
    async fn process(&self, message: &QueueMessage) -> Result<(), WorkerError> {
        match self.run_job(&message.body).await {
            Ok(()) => info!("Deployment job finished"),
            Err(failure) => {
                error!("Job failed, containing: {}", failure.source);
                self.contain_failure(failure.deployment_id.as_deref()).await;
            }
        }
        Ok(())
    }

    async fn run_job(&self, body: &str) -> Result<(), JobFailure> {
        let mut fsm = JobFsm::new();

        // Intake and the single parse of the message body. Failures here
        // carry no deployment identity.
        let request = match self.intake(&mut fsm, body).await {
            Ok(request) => request,
            Err(source) => {
                let _ = fsm.advance(JobPhase::Failed);
                return Err(JobFailure {
                    deployment_id: None,
                    source,
                });
            }
        };

        // The parsed id is threaded into every later failure; the body is
        // never parsed a second time.
        match self.drive(&mut fsm, &request).await {
            Ok(()) => Ok(()),
            Err(source) => {
                let _ = fsm.advance(JobPhase::Failed);
                Err(JobFailure {
                    deployment_id: Some(request.deployment_id.clone()),
                    source,
                })
            }
        }
    }

    /// The task is marked running before the body is even parsed, so a crash
    /// mid-intake still leaves it discoverable as running.
    async fn intake(
        &self,
        fsm: &mut JobFsm,
        body: &str,
    ) -> Result<DeploymentRequest, WorkerError> {
        fsm.advance(JobPhase::Intake)?;
        self.store
            .set_state(&self.task_id, TaskState::Running)
            .await?;

        let request = DeploymentRequest::parse(body)?;
        info!(
            "Deployment request accepted: {} (topic {}, protocol {})",
            request.deployment_id, request.topic, request.protocol
        );
        Ok(request)
    }

    async fn drive(
        &self,
        fsm: &mut JobFsm,
        request: &DeploymentRequest,
    ) -> Result<(), WorkerError> {
        let deployment_id = &request.deployment_id;

        fsm.advance(JobPhase::NotifyPending)?;
        self.hosting
            .change_status(&StatusUpdate::pending(deployment_id))
            .await?;

        fsm.advance(JobPhase::Executing)?;
        let started = Instant::now();
        let outcome = self.executor.execute(request).await?;
        let build_time = started.elapsed().as_secs_f64();
        info!(
            "Deploy command finished with exit code {} in {:.1}s",
            outcome.exit_code, build_time
        );

        fsm.advance(JobPhase::Classifying)?;
        let status = classify(&outcome, &request.protocol);
        let mut logs_to_capture = outcome.logs_to_capture.clone();
        let channel = channels::deployment(&request.topic);
        match status {
            DeploymentStatus::Failed => {
                // A failed or unverifiable deployment must not leak a
                // preview link.
                logs_to_capture.site_preview.clear();
                self.events
                    .publish(
                        &channel,
                        &DeploymentEvent::failure(build_time, outcome.exit_code),
                    )
                    .await?;
            }
            DeploymentStatus::Deployed => {
                self.events
                    .publish(
                        &channel,
                        &DeploymentEvent::success(
                            build_time,
                            logs_to_capture.clone(),
                            outcome.exit_code,
                        ),
                    )
                    .await?;
            }
        }

        fsm.advance(JobPhase::Reporting)?;
        let report = DeploymentReport {
            deployment_status: status,
            logs: outcome.process_output.clone(),
            logs_to_capture: logs_to_capture.clone(),
            task_id: self.task_id.clone(),
            deployment_id: Some(deployment_id.clone()),
            build_time,
        };
        let response = self.hosting.deployment_finished(&report).await?;
        debug!("Hosting service response: {}", response);

        if !request.paid_via_subscription {
            fsm.advance(JobPhase::Billing)?;
            let fee = extract_fee(outcome.logs_to_capture.fee.as_deref())?;
            let payment = PaymentRequest {
                build_time,
                wallet_id: request.wallet_id.clone(),
                wallet_address: request.wallet_address.clone(),
                deployment_id: deployment_id.clone(),
                should_charge_fee: outcome.exit_code == 0,
                provider: request.protocol.clone(),
                fee,
                captured_logs: logs_to_capture,
                topic: request.topic.clone(),
            };
            let response = self.payment.trigger(&payment).await?;
            debug!("Payment service response: {}", response);
        }

        // Last persisted effect of the success path; the processed signal
        // re-applies it.
        fsm.advance(JobPhase::Stopped)?;
        self.store
            .set_desired_state(&self.task_id, DesiredState::Stopped)
            .await?;

        Ok(())
    }

    /// Uniform failure path: flip the desired state, report a failed
    /// deployment with no build time, skip billing, and swallow everything so
    /// the consumer still sees handler success.
    async fn contain_failure(&self, deployment_id: Option<&str>) {
        self.stop_task_best_effort().await;

        let report = DeploymentReport {
            deployment_status: DeploymentStatus::Failed,
            logs: String::new(),
            logs_to_capture: CapturedLogs::default(),
            task_id: self.task_id.clone(),
            deployment_id: deployment_id.map(str::to_string),
            build_time: 0.0,
        };

        match self.hosting.deployment_finished(&report).await {
            Ok(response) => debug!("Hosting service response: {}", response),
            Err(e) => error!("Failed to deliver the failure report: {}", e),
        }
    }

    async fn stop_task_best_effort(&self) {
        if let Err(e) = self
            .store
            .set_desired_state(&self.task_id, DesiredState::Stopped)
            .await
        {
            error!("Failed to persist desired state: {}", e);
        }
    }
}

#[async_trait]
impl JobHandler for TaskController {
    async fn handle(&self, message: &QueueMessage) -> Result<(), WorkerError> {
        self.process(message).await
    }
}

#[async_trait]
impl LifecycleEvents for TaskController {
    async fn message_received(&self, message: &QueueMessage) {
        info!("Queue message received: {}", message.id);
    }

    async fn message_processed(&self, message: &QueueMessage) {
        debug!("Queue message processed: {}", message.id);
        // Already flipped by the success path; re-applying is idempotent.
        self.stop_task_best_effort().await;
    }

    async fn processing_error(&self, err: &WorkerError) {
        error!("Message handler failed: {}", err);
        self.stop_task_best_effort().await;
    }

    async fn transport_error(&self, err: &WorkerError) {
        error!("Queue consumer error: {}", err);
        self.stop_task_best_effort().await;
    }
}
