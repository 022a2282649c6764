mod loader;
mod properties;

pub use loader::{load_config_str, ConfigFormat, LoadedConfig};
pub use properties::{parse_bool, Properties};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, RoutingError};
use crate::expressions::{parse_template, Template};
use crate::policy::{RoutingDecision, RoutingPolicy};
use crate::record::Record;

pub const DEFAULT_DELIMITER: &str = ".";

/// Routing-key settings, validated once at startup by [`RoutingConfig::compile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    pub template: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default)]
    pub error_on_empty: bool,
    #[serde(default)]
    pub remove_values: bool,
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

impl RoutingConfig {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            delimiter: default_delimiter(),
            default_value: None,
            error_on_empty: false,
            remove_values: false,
        }
    }

    /// Read the `RoutingKey*` and `RemoveRkValuesFromRecord` host properties.
    pub fn from_properties(props: &Properties) -> Result<Self, ConfigError> {
        Ok(Self {
            template: props.require("RoutingKey")?.to_string(),
            delimiter: props
                .get("RoutingKeyDelimiter")
                .unwrap_or(DEFAULT_DELIMITER)
                .to_string(),
            default_value: props.get("RoutingKeyDefaultValue").map(str::to_string),
            error_on_empty: props.flag("RoutingKeyErrorOnEmpty")?,
            remove_values: props.flag("RemoveRkValuesFromRecord")?,
        })
    }

    /// The configured delimiter, or `.` when it was left empty.
    pub fn effective_delimiter(&self) -> &str {
        if self.delimiter.is_empty() {
            DEFAULT_DELIMITER
        } else {
            &self.delimiter
        }
    }

    pub fn compile(&self) -> Result<CompiledRouting, ConfigError> {
        let template = parse_template(&self.template, self.effective_delimiter())?;
        Ok(CompiledRouting {
            template,
            policy: RoutingPolicy {
                default_value: self.default_value.clone(),
                error_on_empty: self.error_on_empty,
            },
            remove_values: self.remove_values,
        })
    }
}

/// A validated template together with the policy applied to its results.
#[derive(Debug, Clone)]
pub struct CompiledRouting {
    template: Template,
    policy: RoutingPolicy,
    remove_values: bool,
}

impl CompiledRouting {
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Derive the routing key for one record, removing resolved values when configured.
    pub fn route(&self, record: &mut Record) -> Result<RoutingDecision, RoutingError> {
        let outcome = self.template.evaluate(record, self.remove_values);
        self.policy.apply(outcome)
    }
}
