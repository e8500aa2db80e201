//! Identity provider
//!
//! The engine never handles credentials. It sees only the current
//! [`Identity`] and is told when it changes. [`LocalIdentityProvider`] keeps
//! accounts in `users.json` and the signed-in identity in `session.json`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::TaxDocument;
use super::secret::{check_strength, hash_password, verify_password, SecureString};
use crate::audit::{AuditEntry, AuditLogger, Operation};
use crate::config::FluxoPaths;
use crate::error::{FluxoError, FluxoResult};
use crate::models::{Identity, UserId, UserProfile, UserRecord};
use crate::storage::JsonDocument;

/// Callback invoked with the new identity, `None` after sign-out
pub type IdentityListener = Box<dyn FnMut(Option<&Identity>) + Send>;

/// Handle returned by [`IdentityProvider::on_identity_change`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Source of the current identity
pub trait IdentityProvider {
    /// Register an account and sign it in
    fn sign_up(
        &self,
        email: &str,
        password: &SecureString,
        document: &str,
    ) -> FluxoResult<Identity>;

    fn sign_in(&self, email: &str, password: &SecureString) -> FluxoResult<Identity>;

    /// Close the current session; a no-op when nobody is signed in
    fn sign_out(&self) -> FluxoResult<()>;

    fn current(&self) -> FluxoResult<Option<Identity>>;

    /// Be told about every later identity change
    fn on_identity_change(&self, listener: IdentityListener) -> FluxoResult<ListenerId>;

    fn remove_listener(&self, id: ListenerId);
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct UserData {
    users: Vec<UserRecord>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionData {
    identity: Option<Identity>,
    signed_in_at: Option<DateTime<Utc>>,
}

type SharedListener = Arc<Mutex<IdentityListener>>;

/// File-backed identity provider
pub struct LocalIdentityProvider {
    users: JsonDocument<UserData>,
    session: JsonDocument<SessionData>,
    audit: Option<AuditLogger>,
    next_listener: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, SharedListener)>>,
}

impl LocalIdentityProvider {
    pub fn new(paths: &FluxoPaths) -> Self {
        Self {
            users: JsonDocument::new(paths.users_file()),
            session: JsonDocument::new(paths.session_file()),
            audit: None,
            next_listener: AtomicU64::new(0),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Record account activity in an audit log
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Profile stored at registration
    pub fn profile(&self, user_id: UserId) -> FluxoResult<UserProfile> {
        self.load_users()?
            .users
            .into_iter()
            .find(|u| u.id == user_id)
            .map(|u| u.profile)
            .ok_or_else(|| FluxoError::user_not_found(user_id.to_string()))
    }

    fn load_users(&self) -> FluxoResult<UserData> {
        self.users.load_or_default()
    }

    fn open_session(&self, identity: &Identity) -> FluxoResult<()> {
        self.session.store(&SessionData {
            identity: Some(identity.clone()),
            signed_in_at: Some(Utc::now()),
        })
    }

    fn record(&self, operation: Operation, identity: &Identity) {
        if let Some(logger) = &self.audit {
            if let Err(e) = logger.log(&AuditEntry::account(operation, identity)) {
                log::warn!("Failed to write audit entry for {}: {}", operation, e);
            }
        }
    }

    fn notify(&self, identity: Option<&Identity>) {
        let listeners: Vec<SharedListener> = match self.listeners.lock() {
            Ok(list) => list.iter().map(|(_, l)| Arc::clone(l)).collect(),
            Err(e) => {
                log::warn!("Identity listeners unavailable: {}", e);
                return;
            }
        };

        for listener in listeners {
            match listener.lock() {
                Ok(mut callback) => callback(identity),
                Err(e) => log::warn!("Skipping poisoned identity listener: {}", e),
            }
        }
    }
}

fn normalize_email(email: &str) -> FluxoResult<String> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    };

    if valid {
        Ok(email)
    } else {
        Err(FluxoError::Validation(format!("Invalid e-mail address: {}", email)))
    }
}

fn bad_credentials() -> FluxoError {
    FluxoError::Auth("Invalid e-mail or password".into())
}

impl IdentityProvider for LocalIdentityProvider {
    fn sign_up(
        &self,
        email: &str,
        password: &SecureString,
        document: &str,
    ) -> FluxoResult<Identity> {
        let document = TaxDocument::parse(document)?;
        let email = normalize_email(email)?;
        check_strength(password)?;

        let mut data = self.load_users()?;
        if data.users.iter().any(|u| u.profile.email == email) {
            return Err(FluxoError::user_exists(email));
        }

        let record = UserRecord::new(
            UserProfile {
                email,
                document: document.into_string(),
            },
            hash_password(password)?,
        );
        let identity = record.identity();
        data.users.push(record);

        self.users.store(&data)?;
        self.open_session(&identity)?;

        log::info!("Registered {}", identity);
        self.record(Operation::SignUp, &identity);
        self.notify(Some(&identity));
        Ok(identity)
    }

    fn sign_in(&self, email: &str, password: &SecureString) -> FluxoResult<Identity> {
        let email = email.trim().to_lowercase();
        let data = self.load_users()?;

        let record = data
            .users
            .iter()
            .find(|u| u.profile.email == email)
            .ok_or_else(bad_credentials)?;

        if !verify_password(password, &record.password_hash)? {
            return Err(bad_credentials());
        }

        let identity = record.identity();
        self.open_session(&identity)?;

        self.record(Operation::SignIn, &identity);
        self.notify(Some(&identity));
        Ok(identity)
    }

    fn sign_out(&self) -> FluxoResult<()> {
        let previous = self.current()?;
        let had_session = self.session.discard()?;

        if let (true, Some(identity)) = (had_session, previous) {
            self.record(Operation::SignOut, &identity);
            self.notify(None);
        }
        Ok(())
    }

    fn current(&self) -> FluxoResult<Option<Identity>> {
        let session = self.session.load_or_default()?;
        let Some(identity) = session.identity else {
            return Ok(None);
        };

        // A session for an account that no longer exists is treated as signed out
        let known = self
            .load_users()?
            .users
            .iter()
            .any(|u| u.id == identity.user_id);
        Ok(known.then_some(identity))
    }

    fn on_identity_change(&self, listener: IdentityListener) -> FluxoResult<ListenerId> {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .map_err(|e| FluxoError::Auth(format!("Failed to register listener: {}", e)))?
            .push((id, Arc::new(Mutex::new(listener))));
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        if let Ok(mut list) = self.listeners.lock() {
            list.retain(|(lid, _)| *lid != id);
        }
    }
}
