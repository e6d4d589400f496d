//! Queue consumption

pub mod consumer;
pub mod source;
pub mod transport;

/// One message pulled off the shared queue
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub id: String,

    /// Opaque handle used to acknowledge the message
    pub receipt: String,

    /// Raw JSON body
    pub body: String,
}
