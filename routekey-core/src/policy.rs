use crate::error::RoutingError;
use crate::expressions::EvalError;

/// What to do with an evaluation result before the record is published.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingPolicy {
    /// Used whenever the evaluated key is empty or could not be resolved.
    pub default_value: Option<String>,
    /// Fail the flush on an empty key instead of skipping the record.
    pub error_on_empty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    Route(String),
    /// No usable key and no default; `cause` holds the evaluation failure, if any.
    Skip { cause: Option<EvalError> },
}

impl RoutingPolicy {
    pub fn apply(&self, outcome: Result<String, EvalError>) -> Result<RoutingDecision, RoutingError> {
        let (key, cause) = match outcome {
            Ok(key) => (key, None),
            Err(err) => (String::new(), Some(err)),
        };

        if !key.is_empty() {
            return Ok(RoutingDecision::Route(key));
        }
        if let Some(default) = self.default_value.as_deref().filter(|d| !d.is_empty()) {
            return Ok(RoutingDecision::Route(default.to_string()));
        }

        if self.error_on_empty {
            return Err(match cause {
                Some(err) => RoutingError::Unresolved(err),
                None => RoutingError::EmptyKey,
            });
        }
        Ok(RoutingDecision::Skip { cause })
    }
}
