//! Reentrancy state of the write pipeline.
//!
//! A model is `Idle` between writes. The outermost `apply` moves it to
//! `InBatch`, snapshots the previous attributes and resets the changed set.
//! Writes issued by mutator setters or listeners while the batch is open only
//! nest deeper. Once its own work is done the outermost call enters `Draining`
//! and emits one aggregate `change` event per scheduled batch until nothing is
//! pending, then returns to `Idle`.

use std::collections::BTreeMap;

use crate::options::SetOptions;
use crate::value::{Attributes, Value};

/// Observable phase of a model's write pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// No write in progress.
    Idle,
    /// At least one `apply` call is running.
    InBatch,
    /// The outermost call is emitting aggregate `change` events.
    Draining,
}

#[derive(Debug, Default)]
pub(crate) struct Transaction {
    depth: usize,
    draining: bool,
    pending: Option<SetOptions>,
    previous: Attributes,
    changed: BTreeMap<String, Option<Value>>,
}

impl Transaction {
    pub(crate) fn state(&self) -> BatchState {
        if self.draining {
            BatchState::Draining
        } else if self.depth > 0 {
            BatchState::InBatch
        } else {
            BatchState::Idle
        }
    }

    /// Enter a write call. Returns true for the outermost call.
    pub(crate) fn enter(&mut self) -> bool {
        self.depth += 1;
        self.depth == 1
    }

    pub(crate) fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Start a batch from `snapshot`.
    pub(crate) fn open(&mut self, snapshot: Attributes) {
        self.previous = snapshot;
        self.changed.clear();
    }

    /// Abandon any owed aggregate event after a failed outermost call.
    pub(crate) fn abort(&mut self) {
        self.pending = None;
        self.draining = false;
    }

    pub(crate) fn schedule(&mut self, options: &SetOptions) {
        self.pending = Some(options.clone());
    }

    pub(crate) fn take_pending(&mut self) -> Option<SetOptions> {
        self.pending.take()
    }

    pub(crate) fn start_drain(&mut self) {
        self.draining = true;
    }

    pub(crate) fn finish_drain(&mut self) {
        self.draining = false;
        self.pending = None;
    }

    /// Track `key` against its value at the start of the batch.
    pub(crate) fn record(&mut self, key: &str, new: Option<&Value>, previous: Option<&Value>) {
        if new == previous {
            self.changed.remove(key);
        } else {
            self.changed.insert(key.to_string(), new.cloned());
        }
    }

    pub(crate) fn reset_changed(&mut self) {
        self.changed.clear();
    }

    pub(crate) const fn previous(&self) -> &Attributes {
        &self.previous
    }

    pub(crate) const fn changed(&self) -> &BTreeMap<String, Option<Value>> {
        &self.changed
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_enter_exit_tracks_outermost() {
        let mut txn = Transaction::default();
        assert_eq!(txn.state(), BatchState::Idle);

        assert!(txn.enter());
        assert!(!txn.enter());
        assert_eq!(txn.state(), BatchState::InBatch);

        txn.exit();
        assert_eq!(txn.state(), BatchState::InBatch);
        txn.exit();
        assert_eq!(txn.state(), BatchState::Idle);
    }

    #[test]
    fn test_draining_state() {
        let mut txn = Transaction::default();
        txn.enter();
        txn.schedule(&SetOptions::default());
        txn.start_drain();
        assert_eq!(txn.state(), BatchState::Draining);

        assert!(txn.take_pending().is_some());
        assert!(txn.take_pending().is_none());
        txn.finish_drain();
        txn.exit();
        assert_eq!(txn.state(), BatchState::Idle);
    }

    #[test]
    fn test_record_removes_reverted_keys() {
        let mut txn = Transaction::default();
        let before = json!("before");
        let after = json!("after");

        txn.record("k", Some(&after), Some(&before));
        assert_eq!(txn.changed().get("k"), Some(&Some(after)));

        txn.record("k", Some(&before), Some(&before));
        assert!(txn.changed().is_empty());
    }

    #[test]
    fn test_record_unset_as_none() {
        let mut txn = Transaction::default();
        txn.record("gone", None, Some(&json!(1)));
        assert_eq!(txn.changed().get("gone"), Some(&None));
    }

    #[test]
    fn test_abort_clears_pending() {
        let mut txn = Transaction::default();
        txn.enter();
        txn.schedule(&SetOptions::default());
        txn.abort();
        assert!(txn.take_pending().is_none());
    }
}
