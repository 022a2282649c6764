use thiserror::Error;

use crate::expressions::{EvalError, SyntaxError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid routing key template: {0}")]
    Template(#[from] SyntaxError),
    #[error("missing required setting '{0}'")]
    Missing(String),
    #[error("couldn't parse '{key}' as a boolean: '{value}'")]
    InvalidBool { key: String, value: String },
    #[error("couldn't parse '{key}' as a port number: '{value}'")]
    InvalidPort { key: String, value: String },
    #[error("failed to parse config as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse config as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Raised when a record cannot be given a routing key and the
/// configuration asks for the flush to fail instead of skipping it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("the routing key resolved to an empty string")]
    EmptyKey,
    #[error("couldn't create the routing key: {0}")]
    Unresolved(#[from] EvalError),
}
