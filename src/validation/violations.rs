//! Descriptor violations and the error reporting them.

use crate::core::{OperationId, Phase};
use thiserror::Error;

/// A single problem found in a resource descriptor
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DescriptorViolation {
    #[error("Operation '{operation}' has an empty {field}")]
    EmptyField {
        operation: OperationId,
        field: &'static str,
    },

    #[error("Property '{property}' owned by both '{first}' and '{second}' without a shared annotation")]
    DuplicateProperty {
        property: String,
        first: OperationId,
        second: OperationId,
    },

    #[error("Dispatch string '{dispatch}' used by both '{first}' and '{second}'")]
    DuplicateDispatch {
        dispatch: String,
        first: OperationId,
        second: OperationId,
    },

    #[error("Commit name '{name}' generated for both '{first}' and '{second}'")]
    CommitNameCollision {
        name: String,
        first: OperationId,
        second: OperationId,
    },

    #[error("Operation '{operation}' generates commit name '{name}' for both {first:?} and {second:?}")]
    AmbiguousCommitName {
        name: String,
        operation: OperationId,
        first: Phase,
        second: Phase,
    },

    #[error("Base state field '{field}' collides with a reserved table")]
    ReservedBaseField { field: String },

    #[error("Operation '{operation}' drives property '{property}', which names a reserved table")]
    ReservedProperty {
        operation: OperationId,
        property: String,
    },
}

/// Every violation found in a descriptor, in discovery order
#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid resource descriptor: {}", render(.violations))]
pub struct DescriptorError {
    pub violations: Vec<DescriptorViolation>,
}

fn render(violations: &[DescriptorViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
