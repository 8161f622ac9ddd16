//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading or writing a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON or does not match the schema
    #[error("Failed to parse store config: {0}")]
    Parse(String),

    /// Rendering the configuration failed
    #[error("Failed to serialize store config: {0}")]
    Serialize(String),
}
