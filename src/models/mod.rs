//! Core data models for Fluxo
//!
//! Transactions as delivered by the store, the classifications the rule
//! matcher assigns to them, money, ids and identities.

pub mod classification;
pub mod ids;
pub mod money;
pub mod transaction;
pub mod user;

pub use classification::{Classification, ColorToken, Icon};
pub use ids::{TransactionId, UserId};
pub use money::Money;
pub use transaction::{Direction, NewTransaction, Transaction};
pub use user::{Identity, UserProfile, UserRecord};
