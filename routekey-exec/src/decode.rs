use chrono::{DateTime, Utc};
use serde_json::Value;

use routekey_core::Record;

/// One decoded log entry of a flushed batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub timestamp: DateTime<Utc>,
    pub record: Record,
}

impl Entry {
    pub fn new(record: Record) -> Self {
        Self {
            timestamp: Utc::now(),
            record,
        }
    }
}

/// Decode a batch of JSON lines.
///
/// Each non-blank line is either a bare record object, `[timestamp, record]`,
/// or `[[timestamp, metadata], record]`. Timestamps are epoch seconds
/// (integer or fractional) or RFC 3339 strings.
pub fn decode_lines(input: &str) -> Result<Vec<Entry>, DecodeError> {
    let mut entries = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        entries.push(decode_line(line, idx + 1)?);
    }
    Ok(entries)
}

pub fn decode_line(line: &str, line_no: usize) -> Result<Entry, DecodeError> {
    let value: Value = serde_json::from_str(line).map_err(|source| DecodeError::Json {
        line: line_no,
        source,
    })?;

    match value {
        Value::Object(record) => Ok(Entry::new(record)),
        Value::Array(mut pair) if pair.len() == 2 => {
            let record = match pair.pop() {
                Some(Value::Object(record)) => record,
                _ => return Err(DecodeError::Shape { line: line_no }),
            };
            let header = pair.pop().unwrap_or(Value::Null);
            let stamp = match header {
                Value::Array(mut parts) if !parts.is_empty() => parts.swap_remove(0),
                other => other,
            };
            Ok(Entry {
                timestamp: parse_timestamp(&stamp, line_no)?,
                record,
            })
        }
        _ => Err(DecodeError::Shape { line: line_no }),
    }
}

fn parse_timestamp(value: &Value, line_no: usize) -> Result<DateTime<Utc>, DecodeError> {
    let invalid = || DecodeError::Timestamp {
        line: line_no,
        value: value.to_string(),
    };

    match value {
        Value::Number(n) => {
            if let Some(secs) = n.as_i64() {
                return DateTime::from_timestamp(secs, 0).ok_or_else(invalid);
            }
            let secs = n.as_f64().ok_or_else(invalid)?;
            let whole = secs.floor();
            let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
            DateTime::from_timestamp(whole as i64, nanos).ok_or_else(invalid)
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("line {line}: invalid JSON: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: expected a record object or a [timestamp, record] pair")]
    Shape { line: usize },
    #[error("line {line}: invalid timestamp {value}")]
    Timestamp { line: usize, value: String },
}
