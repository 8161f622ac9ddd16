//! Transition handler generation.
//!
//! Every operation contributes three handlers, one per [`Phase`], registered
//! under a [`TransitionKey`]. Handlers are synchronous and infallible; the
//! only failures here are routing failures when a commit names no handler or
//! carries the wrong payload for its phase.

use crate::core::{
    ActionParams, NamingConvention, OperationId, Phase, RequestError, Response, StoreState,
    TransitionKey,
};
use crate::descriptor::{FailureMutation, ResourceDescriptor, SuccessMutation};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

type BeginFn = Arc<dyn Fn(&mut StoreState) + Send + Sync>;
type SucceededFn = Arc<dyn Fn(&mut StoreState, &Response, &ActionParams) + Send + Sync>;
type FailedFn = Arc<dyn Fn(&mut StoreState, &RequestError, &ActionParams) + Send + Sync>;

/// Payload carried by a commit.
#[derive(Clone, Debug, PartialEq)]
pub enum CommitPayload {
    /// No payload; accepted by begin handlers
    None,
    Success {
        response: Response,
        action_params: ActionParams,
    },
    Failure {
        error: RequestError,
        action_params: ActionParams,
    },
}

/// A request to run the handler registered under `key`.
#[derive(Clone, Debug, PartialEq)]
pub struct Commit {
    pub key: TransitionKey,
    pub payload: CommitPayload,
    /// Operation invocation that issued the commit, if any
    pub invocation: Option<Uuid>,
}

impl Commit {
    pub fn new(key: TransitionKey, payload: CommitPayload) -> Self {
        Self {
            key,
            payload,
            invocation: None,
        }
    }

    pub fn begin(operation: impl Into<OperationId>) -> Self {
        Self::new(TransitionKey::begin(operation), CommitPayload::None)
    }

    pub fn succeeded(
        operation: impl Into<OperationId>,
        response: Response,
        action_params: ActionParams,
    ) -> Self {
        Self::new(
            TransitionKey::succeeded(operation),
            CommitPayload::Success {
                response,
                action_params,
            },
        )
    }

    pub fn failed(
        operation: impl Into<OperationId>,
        error: RequestError,
        action_params: ActionParams,
    ) -> Self {
        Self::new(
            TransitionKey::failed(operation),
            CommitPayload::Failure {
                error,
                action_params,
            },
        )
    }

    pub fn with_invocation(mut self, invocation: Uuid) -> Self {
        self.invocation = Some(invocation);
        self
    }
}

/// Errors raised when routing a commit to its handler
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommitError {
    #[error("No transition handler registered for '{key}'")]
    UnknownTransition { key: TransitionKey },

    #[error("No transition handler registered under commit name '{name}'")]
    UnknownCommitName { name: String },

    #[error("Handler for '{key}' cannot accept a {found} payload")]
    PayloadMismatch { key: TransitionKey, found: &'static str },
}

/// A state-transition handler for one phase of one operation.
#[derive(Clone)]
pub enum TransitionHandler {
    Begin(BeginFn),
    Succeeded(SucceededFn),
    Failed(FailedFn),
}

impl TransitionHandler {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Begin(_) => Phase::Begin,
            Self::Succeeded(_) => Phase::Succeeded,
            Self::Failed(_) => Phase::Failed,
        }
    }

    /// Run the handler against `state`. The pending tables are always
    /// updated before any custom mutation runs.
    pub fn apply(
        &self,
        key: &TransitionKey,
        state: &mut StoreState,
        payload: &CommitPayload,
    ) -> Result<(), CommitError> {
        match (self, payload) {
            (Self::Begin(handler), _) => handler(state),
            (
                Self::Succeeded(handler),
                CommitPayload::Success {
                    response,
                    action_params,
                },
            ) => handler(state, response, action_params),
            (
                Self::Failed(handler),
                CommitPayload::Failure {
                    error,
                    action_params,
                },
            ) => handler(state, error, action_params),
            (_, payload) => {
                return Err(CommitError::PayloadMismatch {
                    key: key.clone(),
                    found: payload_kind(payload),
                })
            }
        }
        Ok(())
    }
}

fn payload_kind(payload: &CommitPayload) -> &'static str {
    match payload {
        CommitPayload::None => "empty",
        CommitPayload::Success { .. } => "success",
        CommitPayload::Failure { .. } => "failure",
    }
}

impl fmt::Debug for TransitionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransitionHandler::{}", self.phase().name())
    }
}

fn begin_handler(property: String) -> TransitionHandler {
    TransitionHandler::Begin(Arc::new(move |state: &mut StoreState| {
        state.set_pending(&property, true);
        state.clear_error(&property);
    }))
}

fn succeeded_handler(property: String, mutation: SuccessMutation) -> TransitionHandler {
    TransitionHandler::Succeeded(Arc::new(
        move |state: &mut StoreState, response: &Response, action_params: &ActionParams| {
            state.set_pending(&property, false);
            state.clear_error(&property);

            match &mutation {
                SuccessMutation::Default => state.set(&property, response.data.clone()),
                SuccessMutation::Custom(fold) => fold(state, response, action_params),
            }
        },
    ))
}

fn failed_handler(property: String, mutation: FailureMutation) -> TransitionHandler {
    TransitionHandler::Failed(Arc::new(
        move |state: &mut StoreState, error: &RequestError, action_params: &ActionParams| {
            state.set_pending(&property, false);
            state.set_error(&property, error.value().clone());

            match &mutation {
                FailureMutation::Default => state.set(&property, Value::Null),
                FailureMutation::Custom(fold) => fold(state, error, action_params),
            }
        },
    ))
}

/// Generated handlers keyed by transition, with an index of host-facing
/// commit names.
#[derive(Clone, Debug, Default)]
pub struct TransitionHandlerMap {
    handlers: BTreeMap<TransitionKey, TransitionHandler>,
    names: HashMap<String, TransitionKey>,
}

impl TransitionHandlerMap {
    pub fn get(&self, key: &TransitionKey) -> Option<&TransitionHandler> {
        self.handlers.get(key)
    }

    /// Resolve a commit name such as `FETCH_USER_SUCCEEDED` to its key.
    pub fn resolve(&self, name: &str) -> Option<&TransitionKey> {
        self.names.get(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &TransitionKey> {
        self.handlers.keys()
    }

    /// Commit names and the keys they resolve to, in arbitrary order.
    pub fn commit_names(&self) -> impl Iterator<Item = (&str, &TransitionKey)> {
        self.names.iter().map(|(name, key)| (name.as_str(), key))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Route a commit to its handler and run it.
    pub fn apply(&self, state: &mut StoreState, commit: &Commit) -> Result<(), CommitError> {
        let handler = self
            .get(&commit.key)
            .ok_or_else(|| CommitError::UnknownTransition {
                key: commit.key.clone(),
            })?;
        handler.apply(&commit.key, state, &commit.payload)
    }
}

/// Derive the three transition handlers of every declared operation.
///
/// # Example
///
/// ```rust
/// use resource_store::core::{NamingConvention, Phase, Response, TransitionKey};
/// use resource_store::descriptor::{OperationSpec, ResourceDescriptor};
/// use resource_store::generate::build_transitions;
/// use serde_json::json;
///
/// let spec = OperationSpec::builder()
///     .property("user")
///     .commit("FETCH_USER")
///     .dispatch("fetchUser")
///     .request_async(|_, _| async { Ok(Response::new(json!(null))) })
///     .build()
///     .unwrap();
/// let descriptor = ResourceDescriptor::new().operation("fetchUser", spec);
///
/// let mutations = build_transitions(&descriptor, &NamingConvention::default());
/// assert_eq!(mutations.len(), 3);
/// assert_eq!(
///     mutations.resolve("FETCH_USER_FAILED"),
///     Some(&TransitionKey::new("fetchUser", Phase::Failed))
/// );
/// ```
pub fn build_transitions(
    descriptor: &ResourceDescriptor,
    naming: &NamingConvention,
) -> TransitionHandlerMap {
    let mut map = TransitionHandlerMap::default();

    for (id, spec) in descriptor.operations() {
        let handlers = [
            begin_handler(spec.property.clone()),
            succeeded_handler(spec.property.clone(), spec.on_success.clone()),
            failed_handler(spec.property.clone(), spec.on_failure.clone()),
        ];

        for handler in handlers {
            let key = TransitionKey::new(id.clone(), handler.phase());
            map.names
                .insert(naming.commit_name(&spec.commit_string, key.phase), key.clone());
            map.handlers.insert(key, handler);
        }

        debug!(operation = %id, property = %spec.property, "generated transition handlers");
    }

    map
}
