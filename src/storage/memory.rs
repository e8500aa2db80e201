//! In-process transaction store
//!
//! Holds every collection in memory. Used by tests and by hosts that bring
//! their own persistence. Failures can be injected to exercise the error
//! paths of subscribers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::subscription::{CollectionScope, SnapshotObserver, SubscriberRegistry, Subscription};
use super::TransactionStore;
use crate::config::StoreConfig;
use crate::error::{FluxoError, FluxoResult};
use crate::models::{NewTransaction, Transaction, TransactionId};

#[derive(Default)]
struct State {
    collections: HashMap<CollectionScope, Vec<Transaction>>,
    unavailable: HashMap<CollectionScope, String>,
    fail_next_commit: Option<String>,
}

/// Transaction store kept entirely in memory
pub struct MemoryStore {
    config: StoreConfig,
    state: Mutex<State>,
    registry: Arc<SubscriberRegistry>,
}

impl MemoryStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            state: Mutex::new(State::default()),
            registry: SubscriberRegistry::new(),
        }
    }

    /// Current contents of a collection, in insertion order
    pub fn documents(&self, scope: &CollectionScope) -> FluxoResult<Vec<Transaction>> {
        Ok(self
            .lock()?
            .collections
            .get(scope)
            .cloned()
            .unwrap_or_default())
    }

    /// Number of live subscriptions across all scopes
    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    /// Make the next `commit_batch` fail without writing anything
    pub fn fail_next_commit(&self, message: impl Into<String>) -> FluxoResult<()> {
        self.lock()?.fail_next_commit = Some(message.into());
        Ok(())
    }

    /// Mark a collection unreadable, or readable again with `None`
    ///
    /// Current subscribers of the scope receive the error and are dropped.
    pub fn set_unavailable(
        &self,
        scope: &CollectionScope,
        message: Option<String>,
    ) -> FluxoResult<()> {
        let broadcast = {
            let mut state = self.lock()?;
            match message {
                Some(message) => {
                    state.unavailable.insert(scope.clone(), message.clone());
                    Some(message)
                }
                None => {
                    state.unavailable.remove(scope);
                    None
                }
            }
        };

        if let Some(message) = broadcast {
            log::warn!("Collection {} marked unavailable: {}", scope, message);
            self.registry.broadcast_error(scope, &message);
        }
        Ok(())
    }

    fn lock(&self) -> FluxoResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|e| FluxoError::Storage(format!("Failed to acquire store lock: {}", e)))
    }
}

impl TransactionStore for MemoryStore {
    fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn subscribe(
        &self,
        scope: &CollectionScope,
        observer: Box<dyn SnapshotObserver>,
    ) -> FluxoResult<Subscription> {
        let subscription = self.registry.register(scope.clone(), observer)?;

        let initial = {
            let state = self.lock()?;
            match state.unavailable.get(scope) {
                Some(message) => Err(message.clone()),
                None => Ok(state.collections.get(scope).cloned().unwrap_or_default()),
            }
        };

        match initial {
            Ok(transactions) => self.registry.deliver_snapshot(&subscription, transactions),
            Err(message) => self.registry.deliver_error(&subscription, &message),
        }
        Ok(subscription)
    }

    fn commit_batch(
        &self,
        scope: &CollectionScope,
        documents: Vec<NewTransaction>,
    ) -> FluxoResult<Vec<TransactionId>> {
        let snapshot = {
            let mut state = self.lock()?;

            if let Some(message) = state.fail_next_commit.take() {
                return Err(FluxoError::Storage(message));
            }
            if let Some(message) = state.unavailable.get(scope) {
                return Err(FluxoError::Unavailable(message.clone()));
            }

            let collection = state.collections.entry(scope.clone()).or_default();
            let records: Vec<Transaction> = documents
                .into_iter()
                .map(|doc| doc.into_transaction(TransactionId::new()))
                .collect();
            let ids = records.iter().map(|t| t.id).collect::<Vec<_>>();
            collection.extend(records);

            (ids, collection.clone())
        };

        let (ids, transactions) = snapshot;
        self.registry.broadcast_snapshot(scope, &transactions);
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, Money, UserId};
    use crate::storage::subscription::tests::Recorder;
    use chrono::Utc;

    fn store() -> MemoryStore {
        MemoryStore::new(StoreConfig::new("fluxo-test", "/unused"))
    }

    fn doc(raw: &str, cents: i64) -> NewTransaction {
        NewTransaction::new(
            raw,
            Money::from_cents(cents),
            Utc::now(),
            Direction::from_amount(Money::from_cents(cents)),
        )
    }

    fn scope() -> CollectionScope {
        CollectionScope::new("fluxo-test", UserId::new())
    }

    #[test]
    fn test_subscribe_delivers_initial_snapshot() {
        let store = store();
        let scope = scope();
        store.commit_batch(&scope, vec![doc("A", -100)]).unwrap();

        let rec = Recorder::default();
        let _sub = store.subscribe(&scope, Box::new(rec.clone())).unwrap();
        assert_eq!(rec.events(), vec![Ok(1)]);
    }

    #[test]
    fn test_commit_notifies_with_full_set() {
        let store = store();
        let scope = scope();
        let rec = Recorder::default();
        let _sub = store.subscribe(&scope, Box::new(rec.clone())).unwrap();

        store.commit_batch(&scope, vec![doc("A", -1), doc("B", 2)]).unwrap();
        store.commit_batch(&scope, vec![doc("C", 3)]).unwrap();

        assert_eq!(rec.events(), vec![Ok(0), Ok(2), Ok(3)]);
    }

    #[test]
    fn test_commit_assigns_distinct_ids() {
        let store = store();
        let scope = scope();
        let ids = store
            .commit_batch(&scope, vec![doc("A", -1), doc("A", -1)])
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_failed_commit_writes_nothing() {
        let store = store();
        let scope = scope();
        let rec = Recorder::default();
        let _sub = store.subscribe(&scope, Box::new(rec.clone())).unwrap();

        store.fail_next_commit("disk full").unwrap();
        let err = store.commit_batch(&scope, vec![doc("A", -1)]).unwrap_err();
        assert!(matches!(err, FluxoError::Storage(_)));
        assert!(store.documents(&scope).unwrap().is_empty());
        assert_eq!(rec.events(), vec![Ok(0)]);

        // Only the next commit fails
        store.commit_batch(&scope, vec![doc("A", -1)]).unwrap();
        assert_eq!(store.documents(&scope).unwrap().len(), 1);
    }

    #[test]
    fn test_unavailable_collection() {
        let store = store();
        let scope = scope();
        let rec = Recorder::default();
        let sub = store.subscribe(&scope, Box::new(rec.clone())).unwrap();

        store
            .set_unavailable(&scope, Some("permission denied".into()))
            .unwrap();
        assert_eq!(rec.events(), vec![Ok(0), Err("permission denied".into())]);
        assert!(!sub.is_active());

        let late = Recorder::default();
        let late_sub = store.subscribe(&scope, Box::new(late.clone())).unwrap();
        assert_eq!(late.events(), vec![Err("permission denied".into())]);
        assert!(!late_sub.is_active());
    }

    #[test]
    fn test_scopes_are_isolated() {
        let store = store();
        let (a, b) = (scope(), scope());
        store.commit_batch(&a, vec![doc("A", -1)]).unwrap();
        assert!(store.documents(&b).unwrap().is_empty());
    }

    #[test]
    fn test_dropped_subscription_is_released() {
        let store = store();
        let sub = store.subscribe(&scope(), Box::new(Recorder::default())).unwrap();
        assert_eq!(store.subscriber_count(), 1);
        drop(sub);
        assert_eq!(store.subscriber_count(), 0);
    }
}
