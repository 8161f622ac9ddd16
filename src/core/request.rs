//! Request functions and their outcomes.
//!
//! A request function is opaque to the generator: it receives the call-time
//! `params` and `data` and eventually resolves to a [`Response`] or rejects
//! with a [`RequestError`].

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Successful outcome of a request.
///
/// Only `data` is committed by the default success fold. Every other field
/// the request resolved with (status, headers and the like) is kept in
/// `extra`, so custom folds and callers see the whole response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Payload committed to the property's data slot by default
    #[serde(default)]
    pub data: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Response {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            extra: Map::new(),
        }
    }

    /// Attach a field alongside `data`.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

/// Rejection reason of a request. Carries an arbitrary value.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("request failed: {0}")]
pub struct RequestError(pub Value);

impl RequestError {
    pub fn new(error: impl Into<Value>) -> Self {
        Self(error.into())
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for RequestError {
    fn from(error: Value) -> Self {
        Self(error)
    }
}

impl From<&str> for RequestError {
    fn from(error: &str) -> Self {
        Self(Value::String(error.to_string()))
    }
}

impl From<String> for RequestError {
    fn from(error: String) -> Self {
        Self(Value::String(error))
    }
}

/// Pending outcome returned by a request function.
pub type RequestFuture = BoxFuture<'static, Result<Response, RequestError>>;

/// Request-issuing function of `(params, data)`.
pub type RequestFn = Arc<dyn Fn(Value, Value) -> RequestFuture + Send + Sync>;

/// Wrap an async closure as a [`RequestFn`].
///
/// # Example
///
/// ```rust
/// use resource_store::core::{request_fn, Response};
/// use serde_json::json;
///
/// let fetch_user = request_fn(|params, _data| async move {
///     Ok(Response::new(json!({ "id": params["id"] })))
/// });
/// # let _ = fetch_user;
/// ```
pub fn request_fn<F, Fut>(f: F) -> RequestFn
where
    F: Fn(Value, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, RequestError>> + Send + 'static,
{
    Arc::new(move |params, data| f(params, data).boxed())
}
