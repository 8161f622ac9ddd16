//! The generated store state.
//!
//! A [`StoreState`] holds the resource's base fields, one data slot per
//! declared property, and the `pending` and `error` tables keyed by property.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Field name of the pending table in the flattened state shape.
pub const PENDING_FIELD: &str = "pending";

/// Field name of the error table in the flattened state shape.
pub const ERROR_FIELD: &str = "error";

/// Reactive state owned by the host runtime.
///
/// Mutated only by generated transition handlers (and the custom mutations
/// they delegate to). Serializes to the flattened shape
/// `{ <fields>..., pending: {...}, error: {...} }`.
///
/// # Example
///
/// ```rust
/// use resource_store::core::StoreState;
/// use serde_json::json;
///
/// let mut state = StoreState::new();
/// state.declare_slot("user");
///
/// assert_eq!(state.get("user"), Some(&json!(null)));
/// assert_eq!(state.pending("user"), Some(false));
/// assert_eq!(state.error("user"), Some(&json!(null)));
/// assert_eq!(
///     state.to_value(),
///     json!({ "user": null, "pending": { "user": false }, "error": { "user": null } })
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoreState {
    fields: Map<String, Value>,
    pending: BTreeMap<String, bool>,
    error: BTreeMap<String, Value>,
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow-merge base fields into the state, overwriting same-named fields.
    pub fn merge_fields(&mut self, base: &Map<String, Value>) {
        for (name, value) in base {
            self.fields.insert(name.clone(), value.clone());
        }
    }

    /// Reset the data, pending and error slots of `property` to their
    /// initial values: `null`, `false`, `null`.
    pub fn declare_slot(&mut self, property: &str) {
        self.fields.insert(property.to_string(), Value::Null);
        self.pending.insert(property.to_string(), false);
        self.error.insert(property.to_string(), Value::Null);
    }

    /// Value of a base field or property data slot.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    /// Assign a base field or property data slot.
    pub fn set(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_string(), value);
    }

    /// Raw pending slot; `None` when `property` was never declared.
    pub fn pending(&self, property: &str) -> Option<bool> {
        self.pending.get(property).copied()
    }

    pub fn is_pending(&self, property: &str) -> bool {
        self.pending(property).unwrap_or(false)
    }

    pub fn set_pending(&mut self, property: &str, pending: bool) {
        self.pending.insert(property.to_string(), pending);
    }

    /// Raw error slot; `Some(&Value::Null)` when declared but clear.
    pub fn error(&self, property: &str) -> Option<&Value> {
        self.error.get(property)
    }

    /// The recorded error for `property`, if one is set.
    pub fn failure(&self, property: &str) -> Option<&Value> {
        self.error(property).filter(|value| !value.is_null())
    }

    pub fn set_error(&mut self, property: &str, error: Value) {
        self.error.insert(property.to_string(), error);
    }

    pub fn clear_error(&mut self, property: &str) {
        self.set_error(property, Value::Null);
    }

    /// Declared properties, in sorted order.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.pending.keys().map(String::as_str)
    }

    /// Flattened JSON view of the whole state.
    pub fn to_value(&self) -> Value {
        let mut object = self.fields.clone();
        let pending = self
            .pending
            .iter()
            .map(|(property, flag)| (property.clone(), Value::Bool(*flag)))
            .collect();
        let error = self
            .error
            .iter()
            .map(|(property, error)| (property.clone(), error.clone()))
            .collect();
        object.insert(PENDING_FIELD.to_string(), Value::Object(pending));
        object.insert(ERROR_FIELD.to_string(), Value::Object(error));
        Value::Object(object)
    }
}

impl Serialize for StoreState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
