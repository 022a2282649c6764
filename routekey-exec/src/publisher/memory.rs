use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Exchange, OutboundMessage, PublishError, Publisher};

#[derive(Debug, Default)]
struct State {
    connected: bool,
    connects: usize,
    declared: Vec<Exchange>,
    messages: Vec<OutboundMessage>,
    fail_next_connect: bool,
    fail_next_publish: bool,
}

/// Keeps published messages in memory. Failures can be injected one call at a time.
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    state: Mutex<State>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn messages(&self) -> Vec<OutboundMessage> {
        self.state.lock().await.messages.clone()
    }

    pub async fn declared(&self) -> Vec<Exchange> {
        self.state.lock().await.declared.clone()
    }

    /// Number of connections actually established (not counting no-op calls).
    pub async fn connect_count(&self) -> usize {
        self.state.lock().await.connects
    }

    pub async fn is_connected(&self) -> bool {
        self.state.lock().await.connected
    }

    pub async fn fail_next_connect(&self) {
        self.state.lock().await.fail_next_connect = true;
    }

    pub async fn fail_next_publish(&self) {
        self.state.lock().await.fail_next_publish = true;
    }
}

#[async_trait]
impl Publisher for MemoryPublisher {
    async fn connect(&self, exchange: &Exchange) -> Result<(), PublishError> {
        let mut state = self.state.lock().await;
        if state.connected {
            return Ok(());
        }
        if std::mem::take(&mut state.fail_next_connect) {
            return Err(PublishError::Connect("connection refused".to_string()));
        }
        state.connected = true;
        state.connects += 1;
        state.declared.push(exchange.clone());
        Ok(())
    }

    async fn publish(&self, message: OutboundMessage) -> Result<(), PublishError> {
        let mut state = self.state.lock().await;
        if !state.connected {
            return Err(PublishError::NotConnected);
        }
        if std::mem::take(&mut state.fail_next_publish) {
            return Err(PublishError::Publish("channel closed".to_string()));
        }
        state.messages.push(message);
        Ok(())
    }

    async fn close(&self) {
        self.state.lock().await.connected = false;
    }
}
