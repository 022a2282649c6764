use async_trait::async_trait;
use lapin::options::{BasicPublishOptions, ExchangeDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind};
use tokio::sync::Mutex;
use url::Url;

use super::{Exchange, OutboundMessage, PublishError, Publisher};
use crate::config::BrokerConfig;

const REPLY_SUCCESS: u16 = 200;

/// Publishes to a RabbitMQ-compatible broker over AMQP 0-9-1.
pub struct AmqpPublisher {
    url: Url,
    session: Mutex<Option<Session>>,
}

struct Session {
    connection: Connection,
    channel: Channel,
}

impl Session {
    fn is_open(&self) -> bool {
        self.connection.status().connected() && self.channel.status().connected()
    }

    async fn shutdown(self) {
        if let Err(err) = self.connection.close(REPLY_SUCCESS, "closing").await {
            tracing::debug!(%err, "broker connection was already gone");
        }
    }
}

impl AmqpPublisher {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            session: Mutex::new(None),
        }
    }

    pub fn from_broker(broker: &BrokerConfig) -> Result<Self, url::ParseError> {
        Ok(Self::new(broker.amqp_url()?))
    }

    async fn open(&self, exchange: &Exchange) -> Result<Session, PublishError> {
        let connection = Connection::connect(self.url.as_str(), ConnectionProperties::default())
            .await
            .map_err(|e| PublishError::Connect(e.to_string()))?;

        let channel = match connection.create_channel().await {
            Ok(channel) => channel,
            Err(err) => {
                let failure = PublishError::Connect(format!("failed to open a channel: {err}"));
                if let Err(err) = connection.close(REPLY_SUCCESS, "closing").await {
                    tracing::debug!(%err, "couldn't close the broker connection");
                }
                return Err(failure);
            }
        };
        let session = Session { connection, channel };

        // The default exchange always exists and can't be redeclared.
        if !exchange.name.is_empty() {
            let options = ExchangeDeclareOptions {
                durable: exchange.durable,
                ..ExchangeDeclareOptions::default()
            };
            let declared = session
                .channel
                .exchange_declare(
                    &exchange.name,
                    exchange_kind(&exchange.kind),
                    options,
                    FieldTable::default(),
                )
                .await;
            if let Err(err) = declared {
                session.shutdown().await;
                return Err(PublishError::DeclareExchange {
                    name: exchange.name.clone(),
                    reason: err.to_string(),
                });
            }
        }

        Ok(session)
    }
}

fn exchange_kind(kind: &str) -> ExchangeKind {
    match kind.to_ascii_lowercase().as_str() {
        "direct" => ExchangeKind::Direct,
        "fanout" => ExchangeKind::Fanout,
        "headers" => ExchangeKind::Headers,
        "topic" => ExchangeKind::Topic,
        _ => ExchangeKind::Custom(kind.to_string()),
    }
}

#[async_trait]
impl Publisher for AmqpPublisher {
    async fn connect(&self, exchange: &Exchange) -> Result<(), PublishError> {
        let mut session = self.session.lock().await;
        if session.as_ref().is_some_and(Session::is_open) {
            return Ok(());
        }
        if let Some(stale) = session.take() {
            stale.shutdown().await;
        }

        let opened = self.open(exchange).await?;
        tracing::info!(exchange = %exchange.name, kind = %exchange.kind, "opened broker channel");
        *session = Some(opened);
        Ok(())
    }

    async fn publish(&self, message: OutboundMessage) -> Result<(), PublishError> {
        let session = self.session.lock().await;
        let Some(session) = session.as_ref() else {
            return Err(PublishError::NotConnected);
        };

        let properties = BasicProperties::default().with_content_type(message.content_type.into());
        session
            .channel
            .basic_publish(
                &message.exchange,
                &message.routing_key,
                BasicPublishOptions::default(),
                &message.body,
                properties,
            )
            .await
            .map_err(|e| PublishError::Publish(e.to_string()))?
            .await
            .map_err(|e| PublishError::Publish(e.to_string()))?;
        Ok(())
    }

    async fn close(&self) {
        if let Some(session) = self.session.lock().await.take() {
            session.shutdown().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_kinds_map_case_insensitively() {
        assert!(matches!(exchange_kind("topic"), ExchangeKind::Topic));
        assert!(matches!(exchange_kind("Direct"), ExchangeKind::Direct));
        assert!(matches!(exchange_kind("FANOUT"), ExchangeKind::Fanout));
        assert!(matches!(exchange_kind("headers"), ExchangeKind::Headers));
        assert!(matches!(
            exchange_kind("x-delayed-message"),
            ExchangeKind::Custom(kind) if kind == "x-delayed-message"
        ));
    }
}
