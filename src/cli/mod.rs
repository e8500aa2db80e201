//! CLI command handlers
//!
//! Bridges clap argument parsing with the identity provider, the store and
//! the dashboard session.

pub mod account;
pub mod audit;
pub mod dashboard;

pub use account::{handle_signin, handle_signout, handle_signup, handle_whoami};
pub use audit::handle_audit;
pub use dashboard::{handle_classify, handle_config, handle_dashboard, handle_seed};

use std::sync::{Arc, Mutex};

use crate::audit::AuditLogger;
use crate::auth::{LocalIdentityProvider, SecureString};
use crate::config::{FluxoPaths, Settings};
use crate::dashboard::DashboardEngine;
use crate::error::{FluxoError, FluxoResult};
use crate::session::DashboardSession;
use crate::storage::JsonFileStore;

/// Paths and settings resolved once per invocation
pub struct AppContext {
    pub paths: FluxoPaths,
    pub settings: Settings,
}

impl AppContext {
    pub fn new(paths: FluxoPaths, settings: Settings) -> Self {
        Self { paths, settings }
    }

    /// Resolve paths from the environment and load settings
    pub fn load() -> FluxoResult<Self> {
        let paths = FluxoPaths::new()?;
        let settings = Settings::load_or_create(&paths)?;
        Ok(Self::new(paths, settings))
    }

    pub fn audit(&self) -> AuditLogger {
        AuditLogger::new(self.paths.audit_log())
    }

    pub fn identity_provider(&self) -> LocalIdentityProvider {
        LocalIdentityProvider::new(&self.paths).with_audit(self.audit())
    }

    /// Session bound to the provider's current identity
    pub fn open_session(
        &self,
        provider: &LocalIdentityProvider,
    ) -> FluxoResult<Arc<Mutex<DashboardSession>>> {
        self.paths.ensure_directories()?;

        let store = Arc::new(JsonFileStore::new(self.settings.store_config(&self.paths)));
        let engine = DashboardEngine::from_settings(&self.settings)?;
        let session = Arc::new(Mutex::new(
            DashboardSession::new(store, engine).with_audit(self.audit()),
        ));

        DashboardSession::attach(&session, provider)?;
        Ok(session)
    }
}

/// Use the given password or prompt for one without echo
pub(crate) fn read_password(given: Option<String>, prompt: &str) -> FluxoResult<SecureString> {
    match given {
        Some(password) => Ok(SecureString::from(password)),
        None => rpassword::prompt_password(prompt)
            .map(SecureString::from)
            .map_err(|e| FluxoError::Io(format!("Failed to read password: {}", e))),
    }
}
