mod amqp;
mod memory;
mod writer;

pub use amqp::AmqpPublisher;
pub use memory::MemoryPublisher;
pub use writer::WriterPublisher;

use async_trait::async_trait;
use serde::Serialize;

pub const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exchange {
    pub name: String,
    pub kind: String,
    pub durable: bool,
}

/// One record ready for the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub exchange: String,
    pub routing_key: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// The broker side of the output.
///
/// `connect` is called before every flush and must be a no-op while the
/// connection is healthy; otherwise it (re)connects and declares `exchange`.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn connect(&self, exchange: &Exchange) -> Result<(), PublishError>;

    async fn publish(&self, message: OutboundMessage) -> Result<(), PublishError>;

    /// Drop the connection; the next `connect` starts from scratch.
    async fn close(&self);
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("failed to establish a connection to the broker: {0}")]
    Connect(String),
    #[error("failed to declare exchange '{name}': {reason}")]
    DeclareExchange { name: String, reason: String },
    #[error("not connected to the broker")]
    NotConnected,
    #[error("couldn't publish record: {0}")]
    Publish(String),
    #[error("couldn't write message: {0}")]
    Io(#[from] std::io::Error),
}
