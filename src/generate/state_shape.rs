//! Initial state derivation.

use crate::core::StoreState;
use crate::descriptor::ResourceDescriptor;

/// Derive the initial state of a descriptor.
///
/// Base fields are merged first; then every operation, in declaration
/// order, declares its data, pending and error slots. Operations reusing a
/// property simply re-declare the same initial slots.
///
/// # Example
///
/// ```rust
/// use resource_store::descriptor::ResourceDescriptor;
/// use resource_store::generate::build_state;
/// use serde_json::json;
///
/// let state = build_state(&ResourceDescriptor::new().base_field("page", json!(1)));
/// assert_eq!(state.to_value(), json!({ "page": 1, "pending": {}, "error": {} }));
/// ```
pub fn build_state(descriptor: &ResourceDescriptor) -> StoreState {
    let mut state = StoreState::new();
    state.merge_fields(descriptor.base_state());

    for (_, spec) in descriptor.operations() {
        state.declare_slot(&spec.property);
    }

    state
}
