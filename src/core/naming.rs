//! Identifiers and naming for generated transitions.
//!
//! Transitions are addressed by a [`TransitionKey`], an operation identifier
//! paired with a [`Phase`]. The string commit names a host framework may
//! expect (`FETCH_USER`, `FETCH_USER_SUCCEEDED`, ...) are derived from a
//! [`NamingConvention`] but never used for routing inside this crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a declared operation, unique within a descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(String);

impl OperationId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OperationId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for OperationId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle phase of a single operation invocation.
///
/// # Example
///
/// ```rust
/// use resource_store::core::Phase;
///
/// assert_eq!(Phase::ALL.len(), 3);
/// assert_eq!(Phase::Succeeded.name(), "Succeeded");
/// assert!(Phase::Failed.is_settled());
/// assert!(!Phase::Begin.is_settled());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    /// Request about to start: pending is armed, stale error cleared
    Begin,
    /// Request resolved with a response
    Succeeded,
    /// Request rejected with an error
    Failed,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Begin, Phase::Succeeded, Phase::Failed];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Begin => "Begin",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
        }
    }

    /// True for the phases that end an invocation.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Key under which a transition handler is registered.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionKey {
    pub operation: OperationId,
    pub phase: Phase,
}

impl TransitionKey {
    pub fn new(operation: impl Into<OperationId>, phase: Phase) -> Self {
        Self {
            operation: operation.into(),
            phase,
        }
    }

    pub fn begin(operation: impl Into<OperationId>) -> Self {
        Self::new(operation, Phase::Begin)
    }

    pub fn succeeded(operation: impl Into<OperationId>) -> Self {
        Self::new(operation, Phase::Succeeded)
    }

    pub fn failed(operation: impl Into<OperationId>) -> Self {
        Self::new(operation, Phase::Failed)
    }
}

impl fmt::Display for TransitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.operation, self.phase.name())
    }
}

/// Derives host-facing commit names from an operation's commit string.
///
/// # Example
///
/// ```rust
/// use resource_store::core::{NamingConvention, Phase};
///
/// let naming = NamingConvention::default();
/// assert_eq!(naming.commit_name("FETCH_USER", Phase::Begin), "FETCH_USER");
/// assert_eq!(naming.commit_name("FETCH_USER", Phase::Succeeded), "FETCH_USER_SUCCEEDED");
/// assert_eq!(naming.commit_name("FETCH_USER", Phase::Failed), "FETCH_USER_FAILED");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConvention {
    pub separator: String,
    pub success_suffix: String,
    pub failure_suffix: String,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            separator: "_".to_string(),
            success_suffix: "SUCCEEDED".to_string(),
            failure_suffix: "FAILED".to_string(),
        }
    }
}

impl NamingConvention {
    pub fn commit_name(&self, commit_string: &str, phase: Phase) -> String {
        match phase {
            Phase::Begin => commit_string.to_string(),
            Phase::Succeeded => format!("{commit_string}{}{}", self.separator, self.success_suffix),
            Phase::Failed => format!("{commit_string}{}{}", self.separator, self.failure_suffix),
        }
    }
}
