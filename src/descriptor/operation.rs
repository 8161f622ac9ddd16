//! Declared operations and their result-folding strategies.

use crate::core::{ActionParams, RequestError, RequestFn, Response, StoreState};
use crate::descriptor::builder::OperationBuilder;
use std::fmt;
use std::sync::Arc;

/// Custom fold of a successful response into state.
pub type SuccessFn = Arc<dyn Fn(&mut StoreState, &Response, &ActionParams) + Send + Sync>;

/// Custom fold of a request failure into state.
pub type FailureFn = Arc<dyn Fn(&mut StoreState, &RequestError, &ActionParams) + Send + Sync>;

/// How a successful outcome is folded into state.
#[derive(Clone, Default)]
pub enum SuccessMutation {
    /// Assign `response.data` to the property's data slot
    #[default]
    Default,
    /// Hand full control to caller code; the data slot is left untouched
    Custom(SuccessFn),
}

impl SuccessMutation {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&mut StoreState, &Response, &ActionParams) + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Debug for SuccessMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How a failed outcome is folded into state.
#[derive(Clone, Default)]
pub enum FailureMutation {
    /// Reset the property's data slot to `null`
    #[default]
    Default,
    /// Hand full control to caller code; the data slot is left untouched
    Custom(FailureFn),
}

impl FailureMutation {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&mut StoreState, &RequestError, &ActionParams) + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Debug for FailureMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One declared unit of asynchronous work.
///
/// Binds a state property to a request function and to the commit/dispatch
/// names a host uses to address it.
#[derive(Clone)]
pub struct OperationSpec {
    pub property: String,
    pub commit_string: String,
    pub dispatch_string: String,
    pub request: RequestFn,
    pub on_success: SuccessMutation,
    pub on_failure: FailureMutation,
    /// Allows other operations marked `shared` to own the same property
    pub shared: bool,
}

impl OperationSpec {
    pub fn builder() -> OperationBuilder {
        OperationBuilder::new()
    }
}

impl fmt::Debug for OperationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationSpec")
            .field("property", &self.property)
            .field("commit_string", &self.commit_string)
            .field("dispatch_string", &self.dispatch_string)
            .field("on_success", &self.on_success)
            .field("on_failure", &self.on_failure)
            .field("shared", &self.shared)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request_fn;
    use serde_json::json;

    #[test]
    fn mutations_default_to_builtin_behavior() {
        assert!(!SuccessMutation::default().is_custom());
        assert!(!FailureMutation::default().is_custom());
    }

    #[test]
    fn custom_success_mutation_runs_caller_code() {
        let mutation = SuccessMutation::custom(|state, response, _| {
            state.set("total", response.data["count"].clone());
        });

        let mut state = StoreState::new();
        if let SuccessMutation::Custom(f) = &mutation {
            f(&mut state, &Response::new(json!({ "count": 4 })), &ActionParams::new());
        }

        assert!(mutation.is_custom());
        assert_eq!(state.get("total"), Some(&json!(4)));
    }

    #[test]
    fn debug_hides_closures() {
        let spec = OperationSpec {
            property: "user".to_string(),
            commit_string: "FETCH_USER".to_string(),
            dispatch_string: "fetchUser".to_string(),
            request: request_fn(|_, _| async { Ok(Response::new(json!(null))) }),
            on_success: SuccessMutation::custom(|_, _, _| {}),
            on_failure: FailureMutation::Default,
            shared: false,
        };

        let rendered = format!("{spec:?}");
        assert!(rendered.contains("Custom(..)"));
        assert!(rendered.contains("FETCH_USER"));
    }
}
