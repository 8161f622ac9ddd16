//! Resource Store: reactive store generation from resource descriptors
//!
//! A resource descriptor declares named operations, each bound to a state
//! property, a request function and a commit/dispatch naming pair. From it
//! this crate derives everything a reactive store needs, so the wiring
//! between "start a request", "track in-flight and error status" and "commit
//! the result" is never written by hand.
//!
//! # Core Concepts
//!
//! - **State**: base fields plus a data, pending and error slot per property
//! - **Transition handlers**: begin, succeeded and failed, keyed by
//!   `(operation, phase)` rather than by string concatenation
//! - **Operations**: async callables driving begin → request → settle
//! - **Validation**: accumulating descriptor checks built on Stillwater
//!
//! # Example
//!
//! ```rust
//! use resource_store::core::Response;
//! use resource_store::descriptor::{OperationSpec, ResourceDescriptor};
//! use resource_store::generate::assemble;
//! use serde_json::json;
//!
//! let descriptor = ResourceDescriptor::new()
//!     .base_field("data", json!({}))
//!     .operation(
//!         "fetchUser",
//!         OperationSpec::builder()
//!             .property("user")
//!             .commit("FETCH_USER")
//!             .dispatch("fetchUser")
//!             .request_async(|_, _| async { Ok(Response::new(json!({ "id": 1 }))) })
//!             .build()
//!             .unwrap(),
//!     );
//!
//! let module = assemble(&descriptor).unwrap();
//!
//! assert_eq!(
//!     module.state.to_value(),
//!     json!({ "data": {}, "user": null, "pending": { "user": false }, "error": { "user": null } })
//! );
//! assert_eq!(module.mutations.len(), 3);
//! assert!(module.actions.get("fetchUser").is_some());
//! ```

pub mod config;
pub mod core;
pub mod descriptor;
pub mod generate;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use crate::config::{OverlapPolicy, StoreConfig};
pub use crate::core::{ActionParams, OperationId, Phase, RequestError, Response, StoreState, TransitionKey};
pub use descriptor::{OperationSpec, ResourceDescriptor};
pub use generate::{assemble, Commit, StoreModule};
pub use store::{Store, StoreError};
