//! Descriptor validation.
//!
//! Descriptors are checked with Stillwater's `Validation` type so that every
//! problem is reported in one pass instead of stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use resource_store::core::{NamingConvention, Response};
//! use resource_store::descriptor::{OperationSpec, ResourceDescriptor};
//! use resource_store::validation::{check, DescriptorViolation};
//! use serde_json::json;
//!
//! let op = |dispatch: &str| {
//!     OperationSpec::builder()
//!         .property("user")
//!         .commit(dispatch.to_uppercase())
//!         .dispatch(dispatch)
//!         .request_async(|_, _| async { Ok(Response::new(json!(null))) })
//!         .build()
//!         .unwrap()
//! };
//!
//! let descriptor = ResourceDescriptor::new()
//!     .operation("fetchUser", op("fetchUser"))
//!     .operation("saveUser", op("saveUser"));
//!
//! let error = check(&descriptor, &NamingConvention::default()).unwrap_err();
//! assert!(matches!(
//!     error.violations[0],
//!     DescriptorViolation::DuplicateProperty { .. }
//! ));
//! ```

pub mod rules;
pub mod violations;

pub use rules::{check, validate, DescriptorValidation};
pub use violations::{DescriptorError, DescriptorViolation};
