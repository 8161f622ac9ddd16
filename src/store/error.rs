//! Store runtime errors.

use crate::core::RequestError;
use crate::generate::CommitError;
use thiserror::Error;

/// Errors returned by [`Store`](crate::store::Store) operations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("No action registered under dispatch string '{0}'")]
    UnknownAction(String),

    #[error("Action '{action}' rejected: property '{property}' is already pending")]
    AlreadyPending { action: String, property: String },

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error(transparent)]
    Request(#[from] RequestError),
}

impl StoreError {
    /// The request's rejection value, when the dispatch failed in the request.
    pub fn request_error(&self) -> Option<&RequestError> {
        match self {
            Self::Request(error) => Some(error),
            _ => None,
        }
    }
}
