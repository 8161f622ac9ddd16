//! Builder for constructing operation specs.

use crate::core::{request_fn, ActionParams, RequestError, RequestFn, Response, StoreState};
use crate::descriptor::error::BuildError;
use crate::descriptor::operation::{FailureMutation, OperationSpec, SuccessMutation};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Builder for operation specs with a fluent API.
///
/// # Example
///
/// ```rust
/// use resource_store::descriptor::OperationSpec;
/// use resource_store::core::Response;
/// use serde_json::json;
///
/// let spec = OperationSpec::builder()
///     .property("user")
///     .commit("FETCH_USER")
///     .dispatch("fetchUser")
///     .request_async(|_, _| async { Ok(Response::new(json!({ "id": 1 }))) })
///     .build()
///     .unwrap();
///
/// assert_eq!(spec.property, "user");
/// ```
#[derive(Default)]
pub struct OperationBuilder {
    property: Option<String>,
    commit_string: Option<String>,
    dispatch_string: Option<String>,
    request: Option<RequestFn>,
    on_success: SuccessMutation,
    on_failure: FailureMutation,
    shared: bool,
}

impl OperationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the owned state property (required).
    pub fn property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// Set the commit string, root of the transition names (required).
    pub fn commit(mut self, commit_string: impl Into<String>) -> Self {
        self.commit_string = Some(commit_string.into());
        self
    }

    /// Set the dispatch string the operation is invoked by (required).
    pub fn dispatch(mut self, dispatch_string: impl Into<String>) -> Self {
        self.dispatch_string = Some(dispatch_string.into());
        self
    }

    /// Set the request function (required).
    pub fn request(mut self, request: RequestFn) -> Self {
        self.request = Some(request);
        self
    }

    /// Set the request function from an async closure (required).
    pub fn request_async<F, Fut>(self, f: F) -> Self
    where
        F: Fn(Value, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, RequestError>> + Send + 'static,
    {
        self.request(request_fn(f))
    }

    /// Replace the default success fold (optional).
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut StoreState, &Response, &ActionParams) + Send + Sync + 'static,
    {
        self.on_success = SuccessMutation::Custom(Arc::new(f));
        self
    }

    /// Replace the default failure fold (optional).
    pub fn on_failure<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut StoreState, &RequestError, &ActionParams) + Send + Sync + 'static,
    {
        self.on_failure = FailureMutation::Custom(Arc::new(f));
        self
    }

    /// Declare the property as intentionally shared with other operations.
    pub fn shared(mut self) -> Self {
        self.shared = true;
        self
    }

    /// Build the operation spec.
    pub fn build(self) -> Result<OperationSpec, BuildError> {
        let property = self.property.ok_or(BuildError::MissingProperty)?;
        let commit_string = self.commit_string.ok_or(BuildError::MissingCommitString)?;
        let dispatch_string = self
            .dispatch_string
            .ok_or(BuildError::MissingDispatchString)?;
        let request = self.request.ok_or(BuildError::MissingRequest)?;

        Ok(OperationSpec {
            property,
            commit_string,
            dispatch_string,
            request,
            on_success: self.on_success,
            on_failure: self.on_failure,
            shared: self.shared,
        })
    }
}
