use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Which built-in behaviors a new [`StandIn`](crate::StandIn) starts with.
///
/// Seeded behaviors are installed as recording, identity equality, then
/// default values, so the recorder sees every call and default values only
/// answer what nothing else did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandInConfig {
    /// Give `equals`, `hash_code` and `to_string` identity semantics.
    pub identity_equality: bool,
    /// Answer unhandled calls with zero values instead of failing.
    pub default_values: bool,
    /// Log every call and its outcome.
    pub record_calls: bool,
}

impl Default for StandInConfig {
    fn default() -> Self {
        Self {
            identity_equality: true,
            default_values: false,
            record_calls: false,
        }
    }
}

impl StandInConfig {
    /// Strict stand-in that fails every unhandled call.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Stand-in that answers every unhandled call with zero values.
    pub fn loose() -> Self {
        Self {
            default_values: true,
            ..Self::default()
        }
    }

    pub fn with_recording(mut self) -> Self {
        self.record_calls = true;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }
}
