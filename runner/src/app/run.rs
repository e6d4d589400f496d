//! Main application run loop

use std::future::Future;
use std::sync::Arc;

use tracing::{error, info};

use crate::app::options::AppOptions;
use crate::controller::TaskController;
use crate::deploy::process::ProcessExecutor;
use crate::errors::WorkerError;
use crate::events::mqtt::MqttEmitter;
use crate::http::hosting::HttpHostingApi;
use crate::http::payment::HttpPaymentApi;
use crate::queue::consumer::Consumer;
use crate::queue::transport::HttpQueueSource;
use crate::task::store::{FileTaskStore, TaskStateStore};
use crate::task::TaskRecord;

/// Run the deployment runner until its single job completes, a fatal
/// consumer error occurs, or the shutdown signal fires.
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), WorkerError> {
    info!("Initializing deployment runner for task {}...", options.task_id);

    let store: Arc<dyn TaskStateStore> = Arc::new(FileTaskStore::new(options.state_dir.clone()));

    // The record exists before any message can arrive, in the startup
    // defaults: idle, desired running.
    store.upsert(&TaskRecord::new(&options.task_id)).await?;

    let hosting = Arc::new(HttpHostingApi::new(&options.hosting_base_url)?);
    let payment = Arc::new(HttpPaymentApi::new(&options.payment_base_url)?);

    let client_id = format!("deploy-runner-{}", options.task_id);
    let (emitter, emitter_handle) = MqttEmitter::connect(&options.broker, &client_id)?;

    let executor = Arc::new(ProcessExecutor::new(options.executor.clone()));

    let controller = Arc::new(TaskController::new(
        options.task_id.clone(),
        store.clone(),
        executor,
        hosting,
        payment,
        Arc::new(emitter),
    ));

    let source = Arc::new(HttpQueueSource::new(options.queue.clone())?);
    let consumer = Consumer::new(
        source,
        controller.clone(),
        controller,
        options.consumer.clone(),
    );

    let result = tokio::select! {
        result = consumer.run() => result,
        _ = shutdown_signal => {
            info!("Shutdown signal received, stopping consumer...");
            consumer.stop();
            Ok(())
        }
    };

    emitter_handle.abort();

    if let Err(e) = &result {
        error!("Consumer terminated with a fatal error: {e}");
    }

    result
}
