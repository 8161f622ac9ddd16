//! Reference host runtime for a generated [`StoreModule`].
//!
//! The [`Store`] owns the generated state, routes commits to the generated
//! transition handlers, and dispatches the generated operations. Every state
//! write is applied by a transition handler and recorded in the history; the
//! state lock is never held across a suspension point.

pub mod error;
pub mod history;

pub use error::StoreError;
pub use history::{CommitHistory, CommitRecord};

use crate::config::{OverlapPolicy, StoreConfig};
use crate::core::{ActionParams, Response, StoreState};
use crate::generate::{
    Commit, CommitError, CommitFn, CommitPayload, OperationFuture, OperationMap, StoreModule,
    TransitionHandlerMap,
};
use chrono::Utc;
use futures::future::{self, BoxFuture};
use futures::{FutureExt, TryFutureExt};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// A running store. Clones share the same state and history.
///
/// # Example
///
/// ```rust
/// use resource_store::core::Response;
/// use resource_store::descriptor::{OperationSpec, ResourceDescriptor};
/// use resource_store::generate::assemble;
/// use resource_store::store::Store;
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() {
/// let descriptor = ResourceDescriptor::new().operation(
///     "fetchUser",
///     OperationSpec::builder()
///         .property("user")
///         .commit("FETCH_USER")
///         .dispatch("fetchUser")
///         .request_async(|_, _| async { Ok(Response::new(json!({ "id": 1 }))) })
///         .build()
///         .unwrap(),
/// );
///
/// let store = Store::new(assemble(&descriptor).unwrap());
/// store.dispatch("fetchUser", None).await.unwrap();
///
/// assert_eq!(store.state().get("user"), Some(&json!({ "id": 1 })));
/// # }
/// ```
#[derive(Clone)]
pub struct Store {
    state: Arc<Mutex<StoreState>>,
    mutations: Arc<TransitionHandlerMap>,
    actions: Arc<OperationMap>,
    history: Arc<Mutex<CommitHistory>>,
    overlap: OverlapPolicy,
}

/// Outcome of a dispatch whose begin commit has already been applied.
pub type DispatchFuture = BoxFuture<'static, Result<Response, StoreError>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Store {
    /// Take ownership of a generated module with the default policy.
    pub fn new(module: StoreModule) -> Self {
        Self {
            state: Arc::new(Mutex::new(module.state)),
            mutations: Arc::new(module.mutations),
            actions: Arc::new(module.actions),
            history: Arc::new(Mutex::new(CommitHistory::new())),
            overlap: OverlapPolicy::default(),
        }
    }

    /// Take ownership of a generated module, applying `config`'s policies.
    pub fn with_config(module: StoreModule, config: &StoreConfig) -> Self {
        let store = Self::new(module).with_overlap(config.overlap);
        match config.history_limit {
            Some(limit) => store.with_history_limit(limit),
            None => store,
        }
    }

    pub fn with_overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }

    /// Keep only the `limit` most recent commits in the history.
    pub fn with_history_limit(self, limit: usize) -> Self {
        lock(&self.history).set_limit(limit);
        self
    }

    pub fn overlap(&self) -> OverlapPolicy {
        self.overlap
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> StoreState {
        lock(&self.state).clone()
    }

    /// Snapshot of the commit history.
    pub fn history(&self) -> CommitHistory {
        lock(&self.history).clone()
    }

    pub fn mutations(&self) -> &TransitionHandlerMap {
        &self.mutations
    }

    pub fn actions(&self) -> &OperationMap {
        &self.actions
    }

    /// Apply a commit to the state and record it.
    pub fn commit(&self, commit: Commit) -> Result<(), CommitError> {
        apply_commit(&self.state, &self.mutations, &self.history, commit)
    }

    /// Apply a commit addressed by its host-facing commit name.
    pub fn commit_named(&self, name: &str, payload: CommitPayload) -> Result<(), CommitError> {
        let key = self
            .mutations
            .resolve(name)
            .cloned()
            .ok_or_else(|| CommitError::UnknownCommitName {
                name: name.to_string(),
            })?;
        self.commit(Commit::new(key, payload))
    }

    /// Commit callable handed to operations.
    pub fn commit_fn(&self) -> CommitFn {
        let state = Arc::clone(&self.state);
        let mutations = Arc::clone(&self.mutations);
        let history = Arc::clone(&self.history);

        Arc::new(move |commit: Commit| {
            let key = commit.key.clone();
            if let Err(error) = apply_commit(&state, &mutations, &history, commit) {
                warn!(%key, %error, "dropped commit");
            }
        })
    }

    /// Dispatch the operation registered under `action`.
    ///
    /// The lookup, the overlap check, the begin commit and the start of the
    /// request all happen before this returns; the future only waits for the
    /// request to settle. It resolves or rejects with the request's own
    /// outcome. Under [`OverlapPolicy::Exclusive`] a dispatch whose property
    /// is already pending is rejected before anything is committed.
    pub fn dispatch(&self, action: &str, params: Option<ActionParams>) -> DispatchFuture {
        match self.begin(action, params) {
            Ok(pending) => pending.map_err(StoreError::from).boxed(),
            Err(error) => future::ready(Err(error)).boxed(),
        }
    }

    /// Admit and begin one invocation under a single state lock.
    fn begin(&self, action: &str, params: Option<ActionParams>) -> Result<OperationFuture, StoreError> {
        let operation = self
            .actions
            .get(action)
            .ok_or_else(|| StoreError::UnknownAction(action.to_string()))?;

        let invocation = {
            let mut state = lock(&self.state);
            if self.overlap == OverlapPolicy::Exclusive && state.is_pending(operation.property()) {
                warn!(action, property = operation.property(), "rejected overlapping dispatch");
                return Err(StoreError::AlreadyPending {
                    action: action.to_string(),
                    property: operation.property().to_string(),
                });
            }

            let invocation = operation.prepare(params);
            apply_locked(&mut state, &self.mutations, &self.history, invocation.begin())?;
            invocation
        };

        Ok(invocation.start(self.commit_fn()))
    }
}

fn apply_commit(
    state: &Mutex<StoreState>,
    mutations: &TransitionHandlerMap,
    history: &Mutex<CommitHistory>,
    commit: Commit,
) -> Result<(), CommitError> {
    apply_locked(&mut lock(state), mutations, history, commit)
}

/// Apply a commit to an already locked state and record it.
///
/// The history lock is only ever taken while the state lock is held, so
/// records appear in the order commits were applied.
fn apply_locked(
    state: &mut StoreState,
    mutations: &TransitionHandlerMap,
    history: &Mutex<CommitHistory>,
    commit: Commit,
) -> Result<(), CommitError> {
    mutations.apply(state, &commit)?;

    debug!(key = %commit.key, invocation = ?commit.invocation, "applied commit");

    lock(history).push(CommitRecord {
        key: commit.key,
        invocation: commit.invocation,
        timestamp: Utc::now(),
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Phase, RequestError, TransitionKey};
    use crate::descriptor::{OperationSpec, ResourceDescriptor};
    use crate::generate::assemble;
    use serde_json::{json, Value};

    fn store() -> Store {
        Store::new(store_module())
    }

    fn store_module() -> StoreModule {
        let descriptor = ResourceDescriptor::new()
            .operation(
                "fetchUser",
                OperationSpec::builder()
                    .property("user")
                    .commit("FETCH_USER")
                    .dispatch("fetchUser")
                    .request_async(|params, _| async move {
                        Ok(Response::new(json!({ "id": params["id"] })))
                    })
                    .build()
                    .unwrap(),
            )
            .operation(
                "deleteUser",
                OperationSpec::builder()
                    .property("deleted")
                    .commit("DELETE_USER")
                    .dispatch("deleteUser")
                    .request_async(|_, _| async { Err(RequestError::from("forbidden")) })
                    .build()
                    .unwrap(),
            );
        assemble(&descriptor).unwrap()
    }

    #[test]
    fn manual_commits_route_by_key() {
        let store = store();

        store.commit(Commit::begin("fetchUser")).unwrap();

        assert!(store.state().is_pending("user"));
        assert_eq!(store.history().path_for(&"fetchUser".into()), vec![Phase::Begin]);
    }

    #[test]
    fn commit_named_resolves_legacy_names() {
        let store = store();

        store
            .commit_named(
                "FETCH_USER_SUCCEEDED",
                CommitPayload::Success {
                    response: Response::new(json!("ok")),
                    action_params: ActionParams::new(),
                },
            )
            .unwrap();

        assert_eq!(store.state().get("user"), Some(&json!("ok")));
    }

    #[test]
    fn unknown_commit_name_is_an_error() {
        let store = store();

        let result = store.commit_named("FETCH_USERS", CommitPayload::None);
        assert!(matches!(result, Err(CommitError::UnknownCommitName { .. })));
        assert!(store.history().is_empty());
    }

    #[test]
    fn rejected_commit_is_not_recorded() {
        let store = store();

        let result = store.commit(Commit::new(
            TransitionKey::failed("fetchUser"),
            CommitPayload::None,
        ));

        assert!(result.is_err());
        assert!(store.history().is_empty());
    }

    #[test]
    fn dispatch_begins_before_the_future_is_awaited() {
        let store = store();

        let _dispatch = store.dispatch("fetchUser", None);

        assert!(store.state().is_pending("user"));
        assert_eq!(store.history().path_for(&"fetchUser".into()), vec![Phase::Begin]);
    }

    #[test]
    fn exclusive_rejection_is_ready_immediately() {
        let store = store().with_overlap(OverlapPolicy::Exclusive);

        let _first = store.dispatch("fetchUser", None);
        let second = store.dispatch("fetchUser", None).now_or_never();

        assert_eq!(
            second,
            Some(Err(StoreError::AlreadyPending {
                action: "fetchUser".to_string(),
                property: "user".to_string(),
            }))
        );
        assert_eq!(store.history().len(), 1);
    }

    #[tokio::test]
    async fn history_limit_keeps_latest_commits() {
        let config = StoreConfig::default().with_history_limit(2);
        let store = Store::with_config(store_module(), &config);

        for _ in 0..3 {
            store.dispatch("fetchUser", None).await.unwrap();
        }

        let history = store.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history.limit(), Some(2));
        let records: Vec<_> = history.records().collect();
        assert_eq!(records[0].key, TransitionKey::begin("fetchUser"));
        assert_eq!(records[1].key, TransitionKey::succeeded("fetchUser"));
        assert_eq!(records[0].invocation, records[1].invocation);
    }

    #[tokio::test]
    async fn dispatch_unknown_action_fails_fast() {
        let store = store();

        let result = store.dispatch("createUser", None).await;
        assert_eq!(result, Err(StoreError::UnknownAction("createUser".to_string())));
    }

    #[tokio::test]
    async fn dispatch_settles_success_into_state() {
        let store = store();

        let response = store
            .dispatch("fetchUser", Some(ActionParams::new().with_params(json!({ "id": 3 }))))
            .await
            .unwrap();

        let state = store.state();
        assert_eq!(response.data, json!({ "id": 3 }));
        assert_eq!(state.get("user"), Some(&json!({ "id": 3 })));
        assert_eq!(state.pending("user"), Some(false));
        assert_eq!(state.error("user"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn dispatch_settles_failure_into_state_and_result() {
        let store = store();

        let error = store.dispatch("deleteUser", None).await.unwrap_err();

        assert_eq!(error.request_error(), Some(&RequestError::from("forbidden")));
        let state = store.state();
        assert_eq!(state.get("deleted"), Some(&Value::Null));
        assert_eq!(state.error("deleted"), Some(&json!("forbidden")));
        assert!(!state.is_pending("deleted"));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = store();
        let other = store.clone();

        other.dispatch("fetchUser", None).await.unwrap();

        assert_eq!(store.history().len(), 2);
        assert_eq!(store.state(), other.state());
    }

    #[test]
    fn config_sets_overlap_policy() {
        let descriptor = ResourceDescriptor::new();
        let config = StoreConfig::default().with_overlap(OverlapPolicy::Exclusive);

        let store = Store::with_config(assemble(&descriptor).unwrap(), &config);
        assert_eq!(store.overlap(), OverlapPolicy::Exclusive);
    }
}
