//! Build errors for operation specs.

use thiserror::Error;

/// Errors that can occur when building an operation spec.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("Operation property not specified. Call .property(name) before .build()")]
    MissingProperty,

    #[error("Commit string not specified. Call .commit(name) before .build()")]
    MissingCommitString,

    #[error("Dispatch string not specified. Call .dispatch(name) before .build()")]
    MissingDispatchString,

    #[error("Request function not specified. Call .request(fn) before .build()")]
    MissingRequest,
}
