//! File-backed transaction store
//!
//! Each collection is one JSON document under the data directory, mirroring
//! the collection path: `artifacts/{app}/users/{uid}/transactions.json`.
//! Each batch replaces the document through [`JsonDocument::store`], so a
//! failed batch leaves the previous file intact.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::document::JsonDocument;
use super::subscription::{CollectionScope, SnapshotObserver, SubscriberRegistry, Subscription};
use super::TransactionStore;
use crate::config::StoreConfig;
use crate::error::{FluxoError, FluxoResult};
use crate::models::{NewTransaction, Transaction, TransactionId};

/// Serializable container for one collection
#[derive(Debug, Default, Serialize, Deserialize)]
struct CollectionData {
    transactions: Vec<Transaction>,
}

/// Transaction store persisted as JSON files
pub struct JsonFileStore {
    config: StoreConfig,
    write_lock: Mutex<()>,
    registry: Arc<SubscriberRegistry>,
}

impl JsonFileStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            write_lock: Mutex::new(()),
            registry: SubscriberRegistry::new(),
        }
    }

    /// File holding a collection
    pub fn collection_file(&self, scope: &CollectionScope) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}.json", scope.path()))
    }

    fn document(&self, scope: &CollectionScope) -> JsonDocument<CollectionData> {
        JsonDocument::new(self.collection_file(scope))
    }

    /// Read a collection from disk; a collection never written is empty
    pub fn load(&self, scope: &CollectionScope) -> FluxoResult<Vec<Transaction>> {
        Ok(self.document(scope).load_or_default()?.transactions)
    }
}

impl TransactionStore for JsonFileStore {
    fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn subscribe(
        &self,
        scope: &CollectionScope,
        observer: Box<dyn SnapshotObserver>,
    ) -> FluxoResult<Subscription> {
        let subscription = self.registry.register(scope.clone(), observer)?;

        match self.load(scope) {
            Ok(transactions) => self.registry.deliver_snapshot(&subscription, transactions),
            Err(e) => {
                log::warn!("Failed to read collection {}: {}", scope, e);
                self.registry.deliver_error(&subscription, &e.to_string());
            }
        }
        Ok(subscription)
    }

    fn commit_batch(
        &self,
        scope: &CollectionScope,
        documents: Vec<NewTransaction>,
    ) -> FluxoResult<Vec<TransactionId>> {
        let (ids, transactions) = {
            let _guard = self
                .write_lock
                .lock()
                .map_err(|e| FluxoError::Storage(format!("Failed to acquire write lock: {}", e)))?;

            let mut data = CollectionData {
                transactions: self.load(scope)?,
            };
            let ids: Vec<TransactionId> = documents
                .into_iter()
                .map(|doc| {
                    let txn = doc.into_transaction(TransactionId::new());
                    let id = txn.id;
                    data.transactions.push(txn);
                    id
                })
                .collect();

            self.document(scope).store(&data)?;
            (ids, data.transactions)
        };

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
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, JsonFileStore, CollectionScope) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(StoreConfig::new("fluxo-test", temp_dir.path()));
        let scope = CollectionScope::new("fluxo-test", UserId::new());
        (temp_dir, store, scope)
    }

    fn doc(raw: &str, cents: i64) -> NewTransaction {
        NewTransaction::new(raw, Money::from_cents(cents), Utc::now(), Direction::Out)
    }

    #[test]
    fn test_missing_file_is_empty_collection() {
        let (_temp, store, scope) = setup();
        assert!(store.load(&scope).unwrap().is_empty());
    }

    #[test]
    fn test_file_mirrors_collection_path() {
        let (temp, store, scope) = setup();
        store.commit_batch(&scope, vec![doc("A", -1)]).unwrap();

        let expected = temp
            .path()
            .join("artifacts/fluxo-test/users")
            .join(scope.user_id.as_uuid().to_string())
            .join("transactions.json");
        assert_eq!(store.collection_file(&scope), expected);
        assert!(expected.exists());
    }

    #[test]
    fn test_commit_persists_across_instances() {
        let (temp, store, scope) = setup();
        let ids = store
            .commit_batch(&scope, vec![doc("A", -1), doc("B", -2)])
            .unwrap();

        let reopened = JsonFileStore::new(StoreConfig::new("fluxo-test", temp.path()));
        let loaded = reopened.load(&scope).unwrap();
        assert_eq!(loaded.iter().map(|t| t.id).collect::<Vec<_>>(), ids);
    }

    #[test]
    fn test_subscribe_and_notify() {
        let (_temp, store, scope) = setup();
        let rec = Recorder::default();
        let _sub = store.subscribe(&scope, Box::new(rec.clone())).unwrap();

        store.commit_batch(&scope, vec![doc("A", -1)]).unwrap();
        assert_eq!(rec.events(), vec![Ok(0), Ok(1)]);
    }

    #[test]
    fn test_corrupt_file_is_stream_error() {
        let (_temp, store, scope) = setup();
        let path = store.collection_file(&scope);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let rec = Recorder::default();
        let sub = store.subscribe(&scope, Box::new(rec.clone())).unwrap();

        let events = rec.events();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_err());
        assert!(!sub.is_active());

        // A corrupt collection is not overwritten by a later batch
        assert!(store.commit_batch(&scope, vec![doc("A", -1)]).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }
}
