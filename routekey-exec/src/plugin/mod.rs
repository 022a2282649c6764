use std::sync::Arc;

use chrono::SecondsFormat;
use serde_json::Value;

use routekey_core::{CompiledRouting, ConfigError, RoutingDecision};

use crate::config::OutputConfig;
use crate::decode::{decode_lines, Entry};
use crate::publisher::{Exchange, OutboundMessage, PublishError, Publisher, CONTENT_TYPE_JSON};

pub const TAG_FIELD: &str = "@tag";
pub const TIMESTAMP_FIELD: &str = "@timestamp";

/// Result of one flush, as reported back to the host runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushStatus {
    Ok,
    /// The batch must not be retried (e.g. an empty routing key with fail-on-empty).
    Error,
    /// The broker was unavailable; the host should hand the batch over again.
    Retry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushReport {
    pub status: FlushStatus,
    pub published: usize,
    pub skipped: usize,
}

impl FlushReport {
    fn new() -> Self {
        Self {
            status: FlushStatus::Ok,
            published: 0,
            skipped: 0,
        }
    }
}

/// One configured output instance.
pub struct OutputPlugin {
    config: OutputConfig,
    routing: CompiledRouting,
    exchange: Exchange,
    publisher: Arc<dyn Publisher>,
}

impl OutputPlugin {
    /// Validate the configuration and open the initial broker connection.
    pub async fn init(
        config: OutputConfig,
        publisher: Arc<dyn Publisher>,
    ) -> Result<Self, InitError> {
        let routing = config.routing.compile()?;
        let exchange = config.broker.exchange();

        publisher.connect(&exchange).await?;
        tracing::info!(
            broker = %config.broker.redacted_url(),
            exchange = %exchange.name,
            "established a connection to the broker"
        );

        Ok(Self {
            config,
            routing,
            exchange,
            publisher,
        })
    }

    /// Decode a JSON-lines batch and flush it. Undecodable input fails the batch.
    pub async fn flush_lines(&self, tag: &str, input: &str) -> FlushReport {
        match decode_lines(input) {
            Ok(entries) => self.flush(tag, entries).await,
            Err(err) => {
                tracing::error!(%err, "couldn't decode batch");
                FlushReport {
                    status: FlushStatus::Error,
                    ..FlushReport::new()
                }
            }
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(tag = %tag, records = entries.len()))]
    pub async fn flush(&self, tag: &str, entries: Vec<Entry>) -> FlushReport {
        let mut report = FlushReport::new();

        if let Err(err) = self.publisher.connect(&self.exchange).await {
            tracing::error!(%err, "failed to re-initialize the broker connection");
            report.status = FlushStatus::Retry;
            return report;
        }

        for entry in entries {
            let mut record = entry.record;
            if self.config.add_tag_to_record {
                record.insert(TAG_FIELD.to_string(), Value::String(tag.to_string()));
            }
            if self.config.add_timestamp_to_record {
                let stamp = entry.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true);
                record.insert(TIMESTAMP_FIELD.to_string(), Value::String(stamp));
            }

            let routing_key = match self.routing.route(&mut record) {
                Ok(RoutingDecision::Route(key)) => key,
                Ok(RoutingDecision::Skip { cause: Some(err) }) => {
                    tracing::warn!(%err, "couldn't access the routing key, skipping record");
                    report.skipped += 1;
                    continue;
                }
                Ok(RoutingDecision::Skip { cause: None }) => {
                    tracing::debug!("empty routing key, skipping record");
                    report.skipped += 1;
                    continue;
                }
                Err(err) => {
                    tracing::error!(%err, "couldn't create the routing key");
                    report.status = FlushStatus::Error;
                    return report;
                }
            };

            let body = match serde_json::to_vec(&record) {
                Ok(body) => body,
                Err(err) => {
                    tracing::warn!(%err, "couldn't serialize record, skipping");
                    report.skipped += 1;
                    continue;
                }
            };

            let message = OutboundMessage {
                exchange: self.exchange.name.clone(),
                routing_key,
                content_type: CONTENT_TYPE_JSON.to_string(),
                body,
            };
            if let Err(err) = self.publisher.publish(message).await {
                self.publisher.close().await;
                tracing::error!(%err, "couldn't publish record");
                report.status = FlushStatus::Retry;
                return report;
            }
            report.published += 1;
        }

        report
    }

    pub async fn exit(&self) {
        self.publisher.close().await;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to initialize the broker connection: {0}")]
    Connect(#[from] PublishError),
}
