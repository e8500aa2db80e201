//! Accounts and sessions
//!
//! Registration validates the taxpayer document and password, hashes the
//! password with Argon2id and signs the new account in. Everything past this
//! module works with an [`Identity`](crate::models::Identity) only.

pub mod document;
pub mod provider;
pub mod secret;

pub use document::{DocumentKind, TaxDocument};
pub use provider::{IdentityListener, IdentityProvider, ListenerId, LocalIdentityProvider};
pub use secret::{SecureString, MIN_PASSWORD_LEN};
