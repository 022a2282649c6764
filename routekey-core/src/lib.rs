#![forbid(unsafe_code)]

//! Routing-key expression language for log records.
//!
//! A template such as `app.$["kubernetes"]["labels"]["team"].$["level"]` is
//! split on a delimiter into literal text and `$`-prefixed accessor segments.
//! [`validate`] checks the grammar once at startup; [`evaluate`] walks a
//! record per accessor and joins the pieces back together, optionally
//! removing every resolved value from the record.

pub mod config;
pub mod error;
pub mod expressions;
pub mod policy;
pub mod record;

pub use crate::config::{
    load_config_str, CompiledRouting, ConfigFormat, LoadedConfig, Properties, RoutingConfig,
};
pub use crate::error::{ConfigError, RoutingError};
pub use crate::expressions::{
    evaluate, parse_template, tokenize, validate, AccessorToken, EvalError, ResolveError, SyntaxError,
    Template,
};
pub use crate::policy::{RoutingDecision, RoutingPolicy};
pub use crate::record::{render_node, Node, Record};
