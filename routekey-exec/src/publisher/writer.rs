use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Exchange, OutboundMessage, PublishError, Publisher};

/// Writes each message as one JSON line instead of sending it to a broker.
pub struct WriterPublisher<W> {
    out: Mutex<W>,
    connected: AtomicBool,
}

impl WriterPublisher<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> WriterPublisher<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            connected: AtomicBool::new(false),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl<W: Write + Send> Publisher for WriterPublisher<W> {
    async fn connect(&self, exchange: &Exchange) -> Result<(), PublishError> {
        if !self.connected.swap(true, Ordering::SeqCst) {
            tracing::debug!(exchange = %exchange.name, kind = %exchange.kind, "declared exchange");
        }
        Ok(())
    }

    async fn publish(&self, message: OutboundMessage) -> Result<(), PublishError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(PublishError::NotConnected);
        }

        // Bodies are JSON records; anything else is shown as text.
        let body = serde_json::from_slice::<Value>(&message.body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&message.body).into_owned()));
        let line = json!({
            "exchange": message.exchange,
            "routing_key": message.routing_key,
            "content_type": message.content_type,
            "body": body,
        });

        let mut out = self
            .out
            .lock()
            .map_err(|_| PublishError::Publish("output lock poisoned".to_string()))?;
        writeln!(out, "{line}")?;
        out.flush()?;
        Ok(())
    }

    async fn close(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }
}
