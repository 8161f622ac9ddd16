//! Commit history tracking.
//!
//! Provides tracking of the commits a store has applied, in the order they
//! were applied, optionally bounded to the most recent records.

use crate::core::{OperationId, Phase, TransitionKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use uuid::Uuid;

/// Record of a single applied commit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Transition the commit was routed to
    pub key: TransitionKey,
    /// Operation invocation that issued the commit
    pub invocation: Option<Uuid>,
    /// When the commit was applied
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of applied commits.
///
/// The `record` method returns a new history with the commit added; the
/// store itself appends in place with `push`. A history built `with_limit`
/// drops its oldest records once the limit is reached.
///
/// # Example
///
/// ```rust
/// use resource_store::core::{Phase, TransitionKey};
/// use resource_store::store::{CommitHistory, CommitRecord};
/// use chrono::Utc;
///
/// let history = CommitHistory::new()
///     .record(CommitRecord {
///         key: TransitionKey::begin("fetchUser"),
///         invocation: None,
///         timestamp: Utc::now(),
///     })
///     .record(CommitRecord {
///         key: TransitionKey::succeeded("fetchUser"),
///         invocation: None,
///         timestamp: Utc::now(),
///     });
///
/// assert_eq!(
///     history.path_for(&"fetchUser".into()),
///     vec![Phase::Begin, Phase::Succeeded]
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitHistory {
    records: VecDeque<CommitRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
}

impl CommitHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty history keeping at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: VecDeque::new(),
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Bound the history to `limit` records, evicting the oldest.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = Some(limit);
        self.evict();
    }

    /// Record a commit, returning a new history.
    pub fn record(&self, record: CommitRecord) -> Self {
        let mut next = self.clone();
        next.push(record);
        next
    }

    /// Append a commit in place, evicting the oldest records over the limit.
    pub fn push(&mut self, record: CommitRecord) {
        self.records.push_back(record);
        self.evict();
    }

    fn evict(&mut self) {
        if let Some(limit) = self.limit {
            while self.records.len() > limit {
                self.records.pop_front();
            }
        }
    }

    /// All records in application order.
    pub fn records(&self) -> impl Iterator<Item = &CommitRecord> {
        self.records.iter()
    }

    /// Phases committed for one operation, in order.
    pub fn path_for(&self, operation: &OperationId) -> Vec<Phase> {
        self.records
            .iter()
            .filter(|record| record.key.operation == *operation)
            .map(|record| record.key.phase)
            .collect()
    }

    /// Records issued by a single operation invocation.
    pub fn invocation(&self, invocation: Uuid) -> Vec<&CommitRecord> {
        self.records
            .iter()
            .filter(|record| record.invocation == Some(invocation))
            .collect()
    }

    /// Time between the first and last applied commit.
    ///
    /// Returns `None` when nothing has been committed.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.front(), self.records.back()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: TransitionKey, invocation: Option<Uuid>) -> CommitRecord {
        CommitRecord {
            key,
            invocation,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = CommitHistory::new();
        assert!(history.is_empty());
        assert!(history.duration().is_none());
        assert!(history.path_for(&OperationId::new("fetchUser")).is_empty());
    }

    #[test]
    fn record_is_immutable() {
        let history = CommitHistory::new();
        let next = history.record(record(TransitionKey::begin("fetchUser"), None));

        assert_eq!(history.len(), 0);
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn push_appends_in_place() {
        let mut history = CommitHistory::new();
        history.push(record(TransitionKey::begin("fetchUser"), None));
        history.push(record(TransitionKey::succeeded("fetchUser"), None));

        assert_eq!(history.len(), 2);
        assert_eq!(history.limit(), None);
    }

    #[test]
    fn limit_evicts_oldest_records() {
        let mut history = CommitHistory::with_limit(2);
        history.push(record(TransitionKey::begin("fetchUser"), None));
        history.push(record(TransitionKey::succeeded("fetchUser"), None));
        history.push(record(TransitionKey::begin("listPosts"), None));

        assert_eq!(history.len(), 2);
        let keys: Vec<_> = history.records().map(|r| r.key.clone()).collect();
        assert_eq!(
            keys,
            vec![TransitionKey::succeeded("fetchUser"), TransitionKey::begin("listPosts")]
        );
    }

    #[test]
    fn set_limit_trims_existing_records() {
        let mut history = CommitHistory::new()
            .record(record(TransitionKey::begin("a"), None))
            .record(record(TransitionKey::succeeded("a"), None))
            .record(record(TransitionKey::begin("b"), None));

        history.set_limit(1);

        assert_eq!(history.len(), 1);
        assert_eq!(history.path_for(&OperationId::new("b")), vec![Phase::Begin]);
    }

    #[test]
    fn record_respects_limit() {
        let history = CommitHistory::with_limit(1)
            .record(record(TransitionKey::begin("a"), None))
            .record(record(TransitionKey::failed("a"), None));

        assert_eq!(history.path_for(&OperationId::new("a")), vec![Phase::Failed]);
    }

    #[test]
    fn path_filters_by_operation() {
        let history = CommitHistory::new()
            .record(record(TransitionKey::begin("fetchUser"), None))
            .record(record(TransitionKey::begin("listPosts"), None))
            .record(record(TransitionKey::failed("fetchUser"), None))
            .record(record(TransitionKey::succeeded("listPosts"), None));

        assert_eq!(
            history.path_for(&OperationId::new("fetchUser")),
            vec![Phase::Begin, Phase::Failed]
        );
        assert_eq!(
            history.path_for(&OperationId::new("listPosts")),
            vec![Phase::Begin, Phase::Succeeded]
        );
    }

    #[test]
    fn invocation_groups_records() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let history = CommitHistory::new()
            .record(record(TransitionKey::begin("fetchUser"), Some(first)))
            .record(record(TransitionKey::begin("fetchUser"), Some(second)))
            .record(record(TransitionKey::succeeded("fetchUser"), Some(first)));

        let records = history.invocation(first);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].key.phase, Phase::Succeeded);
    }

    #[test]
    fn single_record_has_zero_duration() {
        let history = CommitHistory::new().record(record(TransitionKey::begin("a"), None));
        assert_eq!(history.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn history_serializes_correctly() {
        let history = CommitHistory::new()
            .record(record(TransitionKey::begin("fetchUser"), Some(Uuid::new_v4())));

        let json = serde_json::to_string(&history).unwrap();
        let restored: CommitHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, history);
    }
}
