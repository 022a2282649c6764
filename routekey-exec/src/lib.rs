#![forbid(unsafe_code)]

//! Flush driver for the routing-key output.
//!
//! Expression parsing and evaluation live in `routekey-core`; this crate
//! decodes batches, enriches and routes each record and hands it to a
//! [`Publisher`].

pub mod config;
pub mod decode;
pub mod plugin;
pub mod publisher;
pub mod secret;

pub use crate::config::{BrokerConfig, OutputConfig};
pub use crate::decode::{decode_lines, DecodeError, Entry};
pub use crate::plugin::{FlushReport, FlushStatus, InitError, OutputPlugin};
pub use crate::publisher::{
    AmqpPublisher, Exchange, MemoryPublisher, OutboundMessage, PublishError, Publisher, WriterPublisher,
};
pub use crate::secret::SecretValue;
