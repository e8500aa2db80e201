//! User and identity models
//!
//! The engine only ever sees an [`Identity`], an opaque key that selects
//! which transaction collection to subscribe to. [`UserRecord`] is the
//! identity provider's own bookkeeping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;

/// The signed-in user, as seen by everything outside the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
}

impl Identity {
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.email, self.user_id)
    }
}

/// Profile stored alongside the account at registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    /// CPF or CNPJ, digits only
    pub document: String,
}

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub profile: UserProfile,
    /// Argon2id PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(profile: UserProfile, password_hash: String) -> Self {
        Self {
            id: UserId::new(),
            profile,
            password_hash,
            created_at: Utc::now(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.id, self.profile.email.clone())
    }
}
