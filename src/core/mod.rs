//! Core value types shared by the generators and the runtime.
//!
//! This module contains the vocabulary of a generated store:
//! - Operation identifiers, lifecycle phases and transition keys
//! - The store state with its data, pending and error slots
//! - Call-time action parameters and request outcomes
//!
//! Nothing in this module performs I/O.

mod naming;
mod params;
mod request;
mod store_state;

pub use naming::{NamingConvention, OperationId, Phase, TransitionKey};
pub use params::ActionParams;
pub use request::{request_fn, RequestError, RequestFn, RequestFuture, Response};
pub use store_state::{StoreState, ERROR_FIELD, PENDING_FIELD};
