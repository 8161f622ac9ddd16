//! Generation and runtime configuration.
//!
//! A [`StoreConfig`] controls how commit names are derived and how the
//! reference [`Store`](crate::store::Store) treats overlapping dispatches
//! and how much commit history it keeps.
//! Every field has a default, so partial JSON documents are accepted.

use crate::core::NamingConvention;
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::ConfigError;

/// Policy for dispatching an operation whose property is already pending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Overlapping dispatches run; the last to settle decides the final state
    #[default]
    Concurrent,
    /// A dispatch is rejected while its property is pending
    Exclusive,
}

/// Configuration shared by generation and the store runtime.
///
/// # Example
///
/// ```rust
/// use resource_store::config::{OverlapPolicy, StoreConfig};
///
/// let config = StoreConfig::from_json(r#"{ "overlap": "exclusive" }"#).unwrap();
/// assert_eq!(config.overlap, OverlapPolicy::Exclusive);
/// assert_eq!(config.naming.success_suffix, "SUCCEEDED");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub naming: NamingConvention,
    pub overlap: OverlapPolicy,
    /// Most recent commits kept by the store; unbounded when `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_limit: Option<usize>,
}

impl StoreConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Render the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn with_naming(mut self, naming: NamingConvention) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }
}
