//! Declarative description of a remote resource.
//!
//! A [`ResourceDescriptor`] is the single input of generation: an ordered
//! set of named [`OperationSpec`]s plus static base-state fields.

pub mod builder;
pub mod error;
pub mod operation;

pub use builder::OperationBuilder;
pub use error::BuildError;
pub use operation::{FailureFn, FailureMutation, OperationSpec, SuccessFn, SuccessMutation};

use crate::core::OperationId;
use serde_json::{Map, Value};

/// Insertion-ordered mapping from operation name to spec, plus base fields.
///
/// # Example
///
/// ```rust
/// use resource_store::descriptor::{OperationSpec, ResourceDescriptor};
/// use resource_store::core::Response;
/// use serde_json::json;
///
/// let fetch_user = OperationSpec::builder()
///     .property("user")
///     .commit("FETCH_USER")
///     .dispatch("fetchUser")
///     .request_async(|_, _| async { Ok(Response::new(json!({ "id": 1 }))) })
///     .build()
///     .unwrap();
///
/// let descriptor = ResourceDescriptor::new()
///     .base_field("data", json!({}))
///     .operation("fetchUser", fetch_user);
///
/// assert_eq!(descriptor.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ResourceDescriptor {
    base_state: Map<String, Value>,
    operations: Vec<(OperationId, OperationSpec)>,
}

impl ResourceDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one static base-state field.
    pub fn base_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.base_state.insert(name.into(), value);
        self
    }

    /// Replace all base-state fields.
    pub fn with_base_state(mut self, base_state: Map<String, Value>) -> Self {
        self.base_state = base_state;
        self
    }

    /// Declare an operation, builder style.
    pub fn operation(mut self, name: impl Into<OperationId>, spec: OperationSpec) -> Self {
        self.insert(name, spec);
        self
    }

    /// Declare an operation. Re-declaring a name replaces its spec in place,
    /// keeping the original position.
    pub fn insert(&mut self, name: impl Into<OperationId>, spec: OperationSpec) {
        let name = name.into();
        match self.operations.iter_mut().find(|(id, _)| *id == name) {
            Some(entry) => entry.1 = spec,
            None => self.operations.push((name, spec)),
        }
    }

    pub fn base_state(&self) -> &Map<String, Value> {
        &self.base_state
    }

    /// Operations in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = (&OperationId, &OperationSpec)> {
        self.operations.iter().map(|(id, spec)| (id, spec))
    }

    pub fn get(&self, name: &str) -> Option<&OperationSpec> {
        self.operations
            .iter()
            .find(|(id, _)| id.as_str() == name)
            .map(|(_, spec)| spec)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
