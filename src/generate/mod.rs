//! Generation of store structures from a resource descriptor.
//!
//! Each builder is a pure function of the descriptor:
//!
//! - [`build_state`]: the initial state shape
//! - [`build_transitions`]: begin, succeeded and failed handlers per operation
//! - [`build_operations`]: one dispatchable async operation per operation
//! - [`assemble`]: validation plus all three, packaged as a [`StoreModule`]

mod assembler;
mod operations;
mod state_shape;
mod transitions;

pub use assembler::{assemble, assemble_unchecked, assemble_with, StoreModule};
pub use operations::{
    build_operations, CommitFn, Invocation, Operation, OperationFuture, OperationMap,
};
pub use state_shape::build_state;
pub use transitions::{
    build_transitions, Commit, CommitError, CommitPayload, TransitionHandler, TransitionHandlerMap,
};
