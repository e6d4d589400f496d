//! Consumer lifecycle unit tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use deploy_runner::errors::WorkerError;
use deploy_runner::queue::consumer::{Consumer, JobHandler, LifecycleEvents, Options};
use deploy_runner::queue::source::QueueSource;
use deploy_runner::queue::QueueMessage;

fn message(id: &str) -> QueueMessage {
    QueueMessage {
        id: id.to_string(),
        receipt: format!("r-{id}"),
        body: "{}".to_string(),
    }
}

/// Source handing out a scripted sequence of receive results; `None` entries
/// model empty poll windows
struct ScriptedSource {
    receives: Mutex<Vec<Option<QueueMessage>>>,
    acks: Mutex<Vec<String>>,
    fail_receive: bool,
    fail_ack: bool,
}

impl ScriptedSource {
    fn new(receives: Vec<Option<QueueMessage>>) -> Self {
        Self {
            receives: Mutex::new(receives),
            acks: Mutex::new(Vec::new()),
            fail_receive: false,
            fail_ack: false,
        }
    }

    fn failing_receive() -> Self {
        Self {
            fail_receive: true,
            ..Self::new(Vec::new())
        }
    }

    fn failing_ack(receives: Vec<Option<QueueMessage>>) -> Self {
        Self {
            fail_ack: true,
            ..Self::new(receives)
        }
    }
}

#[async_trait]
impl QueueSource for ScriptedSource {
    async fn receive(&self) -> Result<Option<QueueMessage>, WorkerError> {
        if self.fail_receive {
            return Err(WorkerError::TransportError("connection reset".to_string()));
        }
        let mut receives = self.receives.lock().unwrap();
        if receives.is_empty() {
            Ok(None)
        } else {
            Ok(receives.remove(0))
        }
    }

    async fn ack(&self, message: &QueueMessage) -> Result<(), WorkerError> {
        if self.fail_ack {
            return Err(WorkerError::TransportError("ack rejected".to_string()));
        }
        self.acks.lock().unwrap().push(message.id.clone());
        Ok(())
    }
}

/// Handler and event sink recording invocation order into one shared log
struct Recorder {
    log: Mutex<Vec<String>>,
    fail_handler: bool,
}

impl Recorder {
    fn new(fail_handler: bool) -> Self {
        Self {
            log: Mutex::new(Vec::new()),
            fail_handler,
        }
    }

    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobHandler for Recorder {
    async fn handle(&self, message: &QueueMessage) -> Result<(), WorkerError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("handle:{}", message.id));
        if self.fail_handler {
            return Err(WorkerError::InternalError("handler blew up".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LifecycleEvents for Recorder {
    async fn message_received(&self, message: &QueueMessage) {
        self.log
            .lock()
            .unwrap()
            .push(format!("received:{}", message.id));
    }

    async fn message_processed(&self, message: &QueueMessage) {
        self.log
            .lock()
            .unwrap()
            .push(format!("processed:{}", message.id));
    }

    async fn processing_error(&self, _err: &WorkerError) {
        self.log.lock().unwrap().push("processing_error".to_string());
    }

    async fn transport_error(&self, _err: &WorkerError) {
        self.log.lock().unwrap().push("transport_error".to_string());
    }
}

fn consumer_for(source: Arc<ScriptedSource>, recorder: Arc<Recorder>) -> Consumer {
    Consumer::new(
        source,
        recorder.clone(),
        recorder,
        Options {
            poll_delay: Duration::from_millis(1),
        },
    )
}

#[tokio::test]
async fn test_single_message_intake() {
    let source = Arc::new(ScriptedSource::new(vec![
        Some(message("m1")),
        Some(message("m2")),
    ]));
    let recorder = Arc::new(Recorder::new(false));
    let consumer = consumer_for(source.clone(), recorder.clone());

    consumer.run().await.unwrap();

    assert!(consumer.is_stopped());
    assert_eq!(
        recorder.log(),
        vec![
            "received:m1".to_string(),
            "handle:m1".to_string(),
            "processed:m1".to_string(),
        ]
    );
    assert_eq!(*source.acks.lock().unwrap(), vec!["m1".to_string()]);
    // the second message was never fetched
    assert_eq!(source.receives.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_polls_then_message() {
    let source = Arc::new(ScriptedSource::new(vec![None, None, Some(message("m1"))]));
    let recorder = Arc::new(Recorder::new(false));
    let consumer = consumer_for(source, recorder.clone());

    consumer.run().await.unwrap();

    assert_eq!(
        recorder.log(),
        vec![
            "received:m1".to_string(),
            "handle:m1".to_string(),
            "processed:m1".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_handler_error_is_fatal() {
    let source = Arc::new(ScriptedSource::new(vec![Some(message("m1"))]));
    let recorder = Arc::new(Recorder::new(true));
    let consumer = consumer_for(source.clone(), recorder.clone());

    let err = consumer.run().await.unwrap_err();
    assert!(matches!(err, WorkerError::InternalError(_)));

    assert_eq!(
        recorder.log(),
        vec![
            "received:m1".to_string(),
            "handle:m1".to_string(),
            "processing_error".to_string(),
        ]
    );
    // a failed handler never acknowledges the message
    assert!(source.acks.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_receive_failure_is_fatal() {
    let source = Arc::new(ScriptedSource::failing_receive());
    let recorder = Arc::new(Recorder::new(false));
    let consumer = consumer_for(source, recorder.clone());

    let err = consumer.run().await.unwrap_err();
    assert!(matches!(err, WorkerError::TransportError(_)));
    assert_eq!(recorder.log(), vec!["transport_error".to_string()]);
}

#[tokio::test]
async fn test_ack_failure_is_fatal() {
    let source = Arc::new(ScriptedSource::failing_ack(vec![Some(message("m1"))]));
    let recorder = Arc::new(Recorder::new(false));
    let consumer = consumer_for(source, recorder.clone());

    let err = consumer.run().await.unwrap_err();
    assert!(matches!(err, WorkerError::TransportError(_)));
    assert_eq!(
        recorder.log(),
        vec![
            "received:m1".to_string(),
            "handle:m1".to_string(),
            "transport_error".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_stopped_consumer_never_polls() {
    let source = Arc::new(ScriptedSource::new(vec![Some(message("m1"))]));
    let recorder = Arc::new(Recorder::new(false));
    let consumer = consumer_for(source.clone(), recorder.clone());

    consumer.stop();
    consumer.run().await.unwrap();

    assert!(recorder.log().is_empty());
    assert_eq!(source.receives.lock().unwrap().len(), 1);
}
