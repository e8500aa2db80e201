//! Live snapshot subscriptions
//!
//! A store pushes the full contents of a collection to every observer of
//! that collection after each change. Observers are called on the writing
//! thread once the write is complete and the registry lock is released.
//!
//! [`Subscription`] is an RAII handle: dropping it unsubscribes. An error
//! event is terminal; the observer is removed after receiving it.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::config::StoreConfig;
use crate::error::{FluxoError, FluxoResult};
use crate::models::{Identity, Transaction, UserId};

/// Identifies one user's transaction collection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionScope {
    pub app_id: String,
    pub user_id: UserId,
}

impl CollectionScope {
    pub fn new(app_id: impl Into<String>, user_id: UserId) -> Self {
        Self {
            app_id: app_id.into(),
            user_id,
        }
    }

    /// Scope for an identity under the configured namespace
    pub fn for_identity(config: &StoreConfig, identity: &Identity) -> Self {
        Self::new(config.app_id.clone(), identity.user_id)
    }

    /// Collection path: `artifacts/{app}/users/{uid}/transactions`
    pub fn path(&self) -> String {
        format!(
            "artifacts/{}/users/{}/transactions",
            self.app_id,
            self.user_id.as_uuid()
        )
    }
}

impl fmt::Display for CollectionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Full contents of a collection at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub scope: CollectionScope,
    pub transactions: Vec<Transaction>,
}

/// Terminal failure of a subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamError {
    pub scope: CollectionScope,
    pub message: String,
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.scope, self.message)
    }
}

impl From<StreamError> for FluxoError {
    fn from(err: StreamError) -> Self {
        FluxoError::Unavailable(err.to_string())
    }
}

/// Receives events for one subscription
pub trait SnapshotObserver: Send {
    /// A new full snapshot is available
    fn on_snapshot(&mut self, snapshot: Snapshot);

    /// The stream failed; no further events follow
    fn on_error(&mut self, error: StreamError);
}

type SharedObserver = Arc<Mutex<Box<dyn SnapshotObserver>>>;

struct Subscriber {
    scope: CollectionScope,
    observer: SharedObserver,
}

/// Bookkeeping shared by store implementations
#[derive(Default)]
pub struct SubscriberRegistry {
    next_id: AtomicU64,
    subscribers: Mutex<HashMap<u64, Subscriber>>,
}

impl SubscriberRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register an observer; the returned handle unsubscribes on drop
    pub fn register(
        self: &Arc<Self>,
        scope: CollectionScope,
        observer: Box<dyn SnapshotObserver>,
    ) -> FluxoResult<Subscription> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.lock()?.insert(
            id,
            Subscriber {
                scope: scope.clone(),
                observer: Arc::new(Mutex::new(observer)),
            },
        );

        Ok(Subscription {
            id,
            scope,
            registry: Arc::downgrade(self),
        })
    }

    /// Deliver a snapshot to a single subscription
    pub fn deliver_snapshot(&self, subscription: &Subscription, transactions: Vec<Transaction>) {
        let target = self.observer_for(subscription.id);
        if let Some(observer) = target {
            notify(&observer, |o| {
                o.on_snapshot(Snapshot {
                    scope: subscription.scope.clone(),
                    transactions,
                })
            });
        }
    }

    /// Deliver a terminal error to a single subscription and drop it
    pub fn deliver_error(&self, subscription: &Subscription, message: &str) {
        let removed = self
            .lock()
            .ok()
            .and_then(|mut subs| subs.remove(&subscription.id));

        if let Some(sub) = removed {
            notify(&sub.observer, |o| {
                o.on_error(StreamError {
                    scope: sub.scope.clone(),
                    message: message.to_string(),
                })
            });
        }
    }

    /// Push a snapshot to every observer of a scope
    pub fn broadcast_snapshot(&self, scope: &CollectionScope, transactions: &[Transaction]) {
        for observer in self.observers_of(scope) {
            notify(&observer, |o| {
                o.on_snapshot(Snapshot {
                    scope: scope.clone(),
                    transactions: transactions.to_vec(),
                })
            });
        }
    }

    /// Fail every observer of a scope and drop them
    pub fn broadcast_error(&self, scope: &CollectionScope, message: &str) {
        let removed: Vec<SharedObserver> = match self.lock() {
            Ok(mut subs) => {
                let ids: Vec<u64> = subs
                    .iter()
                    .filter(|(_, s)| &s.scope == scope)
                    .map(|(id, _)| *id)
                    .collect();
                ids.iter()
                    .filter_map(|id| subs.remove(id))
                    .map(|s| s.observer)
                    .collect()
            }
            Err(_) => Vec::new(),
        };

        for observer in removed {
            notify(&observer, |o| {
                o.on_error(StreamError {
                    scope: scope.clone(),
                    message: message.to_string(),
                })
            });
        }
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.lock().map(|subs| subs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, id: u64) -> bool {
        self.lock().map(|subs| subs.contains_key(&id)).unwrap_or(false)
    }

    fn remove(&self, id: u64) {
        if let Ok(mut subs) = self.lock() {
            subs.remove(&id);
        }
    }

    fn observer_for(&self, id: u64) -> Option<SharedObserver> {
        self.lock()
            .ok()
            .and_then(|subs| subs.get(&id).map(|s| Arc::clone(&s.observer)))
    }

    // Clones the handles so no registry lock is held while observers run
    fn observers_of(&self, scope: &CollectionScope) -> Vec<SharedObserver> {
        match self.lock() {
            Ok(subs) => subs
                .values()
                .filter(|s| &s.scope == scope)
                .map(|s| Arc::clone(&s.observer))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    fn lock(&self) -> FluxoResult<std::sync::MutexGuard<'_, HashMap<u64, Subscriber>>> {
        self.subscribers
            .lock()
            .map_err(|e| FluxoError::Storage(format!("Failed to acquire subscriber lock: {}", e)))
    }
}

fn notify(observer: &SharedObserver, f: impl FnOnce(&mut dyn SnapshotObserver)) {
    match observer.lock() {
        Ok(mut guard) => f(guard.as_mut()),
        Err(e) => log::warn!("Skipping poisoned snapshot observer: {}", e),
    }
}

/// Handle to a live subscription; dropping it unsubscribes
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    scope: CollectionScope,
    registry: Weak<SubscriberRegistry>,
}

impl Subscription {
    pub fn scope(&self) -> &CollectionScope {
        &self.scope
    }

    /// False once unsubscribed or terminated by an error
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .map(|r| r.contains(self.id))
            .unwrap_or(false)
    }

    /// Stop receiving events
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("scope", &self.scope.path())
            .finish()
    }
}
