use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::QueryStateError;

/// Writes closer together than this are never allowed.
pub const MIN_THROTTLE_MS: u64 = 50;

/// How a URL write affects browser history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    #[default]
    Replace,
    Push,
}

impl FromStr for HistoryMode {
    type Err = QueryStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(HistoryMode::Replace),
            "push" => Ok(HistoryMode::Push),
            other => Err(QueryStateError::UnknownHistoryMode(other.to_string())),
        }
    }
}

/// Write behaviour of a query-state binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryStateOptions {
    /// Minimum time between two URL writes of the same parameter.
    pub throttle_ms: u64,
    pub history: HistoryMode,
}

impl Default for QueryStateOptions {
    fn default() -> Self {
        Self {
            throttle_ms: MIN_THROTTLE_MS,
            history: HistoryMode::Replace,
        }
    }
}

impl QueryStateOptions {
    pub fn with_throttle_ms(mut self, throttle_ms: u64) -> Self {
        self.throttle_ms = throttle_ms;
        self
    }

    pub fn with_history(mut self, history: HistoryMode) -> Self {
        self.history = history;
        self
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Clamp the throttle to [`MIN_THROTTLE_MS`].
    pub fn normalized(mut self) -> Self {
        if self.throttle_ms < MIN_THROTTLE_MS {
            warn!(
                throttle_ms = self.throttle_ms,
                min = MIN_THROTTLE_MS,
                "throttle below minimum, clamping"
            );
            self.throttle_ms = MIN_THROTTLE_MS;
        }
        self
    }
}
