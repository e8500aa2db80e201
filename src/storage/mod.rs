//! Storage layer for Fluxo
//!
//! Transactions live in per-user collections. A store delivers the full
//! contents of a collection to its subscribers after every committed write
//! and accepts new documents in atomic batches.

pub mod document;
pub mod json_file;
pub mod memory;
pub mod subscription;

pub use document::JsonDocument;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use subscription::{
    CollectionScope, Snapshot, SnapshotObserver, StreamError, SubscriberRegistry, Subscription,
};

use crate::config::StoreConfig;
use crate::error::FluxoResult;
use crate::models::{Identity, NewTransaction, TransactionId};

/// A document store holding transaction collections
pub trait TransactionStore: Send + Sync {
    /// Namespace and location this store was built with
    fn config(&self) -> &StoreConfig;

    /// Collection scope for an identity
    fn scope(&self, identity: &Identity) -> CollectionScope {
        CollectionScope::for_identity(self.config(), identity)
    }

    /// Start observing a collection
    ///
    /// The current contents are delivered to the observer before this
    /// returns. If the collection cannot be read the observer receives an
    /// error instead and the returned handle is already inactive.
    fn subscribe(
        &self,
        scope: &CollectionScope,
        observer: Box<dyn SnapshotObserver>,
    ) -> FluxoResult<Subscription>;

    /// Write documents as new records, all or nothing
    ///
    /// The store assigns ids. Subscribers of the scope are notified once the
    /// write is durable.
    fn commit_batch(
        &self,
        scope: &CollectionScope,
        documents: Vec<NewTransaction>,
    ) -> FluxoResult<Vec<TransactionId>>;
}
