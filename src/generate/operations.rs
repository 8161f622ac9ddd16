//! Asynchronous operation generation.

use crate::core::{ActionParams, OperationId, RequestError, RequestFn, Response};
use crate::descriptor::ResourceDescriptor;
use crate::generate::transitions::Commit;
use futures::future::BoxFuture;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Host-supplied commit callable, routed to the transition handlers.
pub type CommitFn = Arc<dyn Fn(Commit) + Send + Sync>;

/// Outcome of one operation invocation, mirroring its request.
pub type OperationFuture = BoxFuture<'static, Result<Response, RequestError>>;

/// A dispatchable operation driving begin, request and settle.
#[derive(Clone)]
pub struct Operation {
    id: OperationId,
    property: String,
    request: RequestFn,
}

impl Operation {
    pub fn id(&self) -> &OperationId {
        &self.id
    }

    /// State property whose slots this operation drives.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Invoke the operation.
    ///
    /// Commits the begin transition and starts the request before returning.
    /// The returned future is the only suspension point: once the request
    /// settles it commits exactly one of succeeded or failed, then yields the
    /// request's own outcome.
    pub fn call(&self, commit: CommitFn, params: Option<ActionParams>) -> OperationFuture {
        let invocation = self.prepare(params);
        commit(invocation.begin());
        invocation.start(commit)
    }

    /// Resolve the parameters of one invocation without committing anything.
    ///
    /// The caller applies [`Invocation::begin`] itself, then calls
    /// [`Invocation::start`].
    pub fn prepare(&self, params: Option<ActionParams>) -> Invocation {
        let invocation = Invocation {
            operation: self.id.clone(),
            id: Uuid::new_v4(),
            action_params: ActionParams::resolve(params),
            request: Arc::clone(&self.request),
        };
        debug!(operation = %invocation.operation, invocation = %invocation.id, "dispatching operation");
        invocation
    }
}

/// A single prepared invocation of an [`Operation`].
pub struct Invocation {
    operation: OperationId,
    id: Uuid,
    action_params: ActionParams,
    request: RequestFn,
}

impl Invocation {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn action_params(&self) -> &ActionParams {
        &self.action_params
    }

    /// Begin commit tagged with this invocation.
    pub fn begin(&self) -> Commit {
        Commit::begin(self.operation.clone()).with_invocation(self.id)
    }

    /// Start the request. The returned future commits the settle transition.
    pub fn start(self, commit: CommitFn) -> OperationFuture {
        let Invocation {
            operation,
            id: invocation,
            action_params,
            request,
        } = self;

        let pending = request(action_params.params.clone(), action_params.data.clone());

        Box::pin(async move {
            match pending.await {
                Ok(response) => {
                    debug!(%operation, %invocation, "request succeeded");
                    commit(
                        Commit::succeeded(operation, response.clone(), action_params)
                            .with_invocation(invocation),
                    );
                    Ok(response)
                }
                Err(error) => {
                    warn!(%operation, %invocation, error = %error, "request failed");
                    commit(
                        Commit::failed(operation, error.clone(), action_params)
                            .with_invocation(invocation),
                    );
                    Err(error)
                }
            }
        })
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("operation", &self.operation)
            .field("id", &self.id)
            .field("action_params", &self.action_params)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("id", &self.id)
            .field("property", &self.property)
            .finish_non_exhaustive()
    }
}

/// Generated operations keyed by dispatch string.
#[derive(Clone, Debug, Default)]
pub struct OperationMap {
    operations: BTreeMap<String, Operation>,
}

impl OperationMap {
    pub fn get(&self, dispatch: &str) -> Option<&Operation> {
        self.operations.get(dispatch)
    }

    /// Dispatch strings in sorted order.
    pub fn dispatch_names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Operation)> {
        self.operations.iter().map(|(name, op)| (name.as_str(), op))
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Derive one dispatchable operation per declared operation.
pub fn build_operations(descriptor: &ResourceDescriptor) -> OperationMap {
    let operations = descriptor
        .operations()
        .map(|(id, spec)| {
            let operation = Operation {
                id: id.clone(),
                property: spec.property.clone(),
                request: Arc::clone(&spec.request),
            };
            (spec.dispatch_string.clone(), operation)
        })
        .collect();

    OperationMap { operations }
}
