//! Dashboard session
//!
//! Follows the signed-in identity. Every identity change drops the current
//! subscription before anything else happens, then subscribes to the new
//! identity's collection. Subscriptions are tagged with a generation and
//! events carrying an older generation are ignored, so a late delivery for a
//! previous user can never reach the current view.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::audit::AuditLogger;
use crate::auth::{IdentityProvider, ListenerId};
use crate::dashboard::{DashboardEngine, DashboardState};
use crate::error::{FluxoError, FluxoResult};
use crate::models::Identity;
use crate::seed::{self, template_set, SeedReport};
use crate::storage::{
    CollectionScope, Snapshot, SnapshotObserver, StreamError, Subscription, TransactionStore,
};

#[derive(Debug)]
struct Shared {
    generation: u64,
    state: DashboardState,
}

/// Receives snapshots for one generation
struct SessionObserver {
    generation: u64,
    engine: Arc<DashboardEngine>,
    shared: Arc<Mutex<Shared>>,
}

impl SessionObserver {
    fn apply(&self, next: impl FnOnce() -> DashboardState) {
        let mut shared = match self.shared.lock() {
            Ok(guard) => guard,
            Err(e) => {
                log::warn!("Dashboard state unavailable: {}", e);
                return;
            }
        };

        if shared.generation != self.generation {
            log::debug!(
                "Dropping event for superseded subscription (generation {}, current {})",
                self.generation,
                shared.generation
            );
            return;
        }
        shared.state = next();
    }
}

impl SnapshotObserver for SessionObserver {
    fn on_snapshot(&mut self, snapshot: Snapshot) {
        let engine = Arc::clone(&self.engine);
        self.apply(move || engine.render(snapshot.transactions));
    }

    fn on_error(&mut self, error: StreamError) {
        log::warn!("Transaction stream failed: {}", error);
        self.apply(move || DashboardState::Unavailable {
            message: error.message,
        });
    }
}

/// Resets the in-flight flag however the seed ends
struct SeedGuard<'a>(&'a AtomicBool);

impl Drop for SeedGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Binds the current identity to a live dashboard
pub struct DashboardSession {
    store: Arc<dyn TransactionStore>,
    engine: Arc<DashboardEngine>,
    audit: Option<AuditLogger>,
    shared: Arc<Mutex<Shared>>,
    identity: Option<Identity>,
    subscription: Option<Subscription>,
    seeding: AtomicBool,
}

impl DashboardSession {
    pub fn new(store: Arc<dyn TransactionStore>, engine: DashboardEngine) -> Self {
        Self {
            store,
            engine: Arc::new(engine),
            audit: None,
            shared: Arc::new(Mutex::new(Shared {
                generation: 0,
                state: DashboardState::SignedOut,
            })),
            identity: None,
            subscription: None,
            seeding: AtomicBool::new(false),
        }
    }

    /// Record seed writes in an audit log
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Follow a provider's identity, starting with its current one
    pub fn attach(
        session: &Arc<Mutex<DashboardSession>>,
        provider: &dyn IdentityProvider,
    ) -> FluxoResult<ListenerId> {
        let current = provider.current()?;
        lock_session(session)?.identity_changed(current.as_ref())?;

        let target = Arc::clone(session);
        provider.on_identity_change(Box::new(move |identity| match target.lock() {
            Ok(mut session) => {
                if let Err(e) = session.identity_changed(identity) {
                    log::warn!("Failed to follow identity change: {}", e);
                }
            }
            Err(e) => log::warn!("Dashboard session unavailable: {}", e),
        }))
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Collection the session is bound to
    pub fn scope(&self) -> Option<CollectionScope> {
        self.identity.as_ref().map(|i| self.store.scope(i))
    }

    /// Current dashboard state
    pub fn state(&self) -> FluxoResult<DashboardState> {
        Ok(self.lock_shared()?.state.clone())
    }

    /// Rebind to a new identity, or to nobody
    ///
    /// The previous subscription is released before the new one is opened.
    /// The new collection's first snapshot has been applied when this
    /// returns.
    pub fn identity_changed(&mut self, identity: Option<&Identity>) -> FluxoResult<()> {
        if self.identity.as_ref() == identity && self.subscription.is_some() {
            return Ok(());
        }

        drop(self.subscription.take());
        self.identity = identity.cloned();

        let generation = {
            let mut shared = self.lock_shared()?;
            shared.generation += 1;
            shared.state = match identity {
                Some(_) => DashboardState::Loading,
                None => DashboardState::SignedOut,
            };
            shared.generation
        };

        let Some(identity) = identity else {
            return Ok(());
        };

        let scope = self.store.scope(identity);
        let observer = SessionObserver {
            generation,
            engine: Arc::clone(&self.engine),
            shared: Arc::clone(&self.shared),
        };

        match self.store.subscribe(&scope, Box::new(observer)) {
            Ok(subscription) => {
                self.subscription = Some(subscription);
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to subscribe to {}: {}", scope, e);
                self.lock_shared()?.state = DashboardState::Unavailable {
                    message: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// Load the demo statement into an empty collection
    ///
    /// Refused unless the dashboard is loaded and empty, and while another
    /// seed from this session is still running.
    pub fn seed(&self, now: DateTime<Utc>) -> FluxoResult<SeedReport> {
        let identity = self
            .identity
            .as_ref()
            .ok_or_else(|| FluxoError::Auth("Not signed in".into()))?;

        if self
            .seeding
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(FluxoError::SeedInFlight);
        }
        let _guard = SeedGuard(&self.seeding);

        if !self.state()?.can_seed() {
            return Err(FluxoError::Validation(
                "Demo data can only be loaded into an empty dashboard".into(),
            ));
        }

        let scope = self.store.scope(identity);
        seed::seed(
            self.store.as_ref(),
            &scope,
            template_set(now),
            self.audit.as_ref(),
        )
    }

    fn lock_shared(&self) -> FluxoResult<MutexGuard<'_, Shared>> {
        self.shared
            .lock()
            .map_err(|e| FluxoError::Storage(format!("Failed to acquire dashboard state: {}", e)))
    }
}

fn lock_session(
    session: &Arc<Mutex<DashboardSession>>,
) -> FluxoResult<MutexGuard<'_, DashboardSession>> {
    session
        .lock()
        .map_err(|e| FluxoError::Storage(format!("Failed to acquire dashboard session: {}", e)))
}
