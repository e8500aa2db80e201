//! Fluxo - personal-finance dashboard engine
//!
//! Turns a user's raw bank statement lines into a categorized, newest-first
//! statement and a running balance, and keeps both current as the underlying
//! collection changes.
//!
//! # Architecture
//!
//! - `classify`: ordered keyword rules mapping descriptors to categories
//! - `aggregate`: display ordering and balance computation
//! - `view`: date and amount labels for each entry
//! - `dashboard`: per-snapshot recompute, dashboard state and greeting
//! - `session`: binds the signed-in identity to a live subscription
//! - `seed`: demo statement loader
//! - `storage`: subscribable transaction stores (in-memory and JSON files)
//! - `auth`: accounts, CPF/CNPJ validation, sessions
//! - `audit`: append-only audit log
//! - `config`: paths and settings
//! - `cli`, `display`: terminal front end
//!
//! # Example
//!
//! ```rust,ignore
//! use fluxo::classify::classify;
//! use fluxo::models::Direction;
//!
//! let c = classify("PGTO *UBER DO BRASIL TEC", Direction::Out);
//! assert_eq!(c.category, "Transporte");
//! ```

pub mod aggregate;
pub mod audit;
pub mod auth;
pub mod classify;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod models;
pub mod seed;
pub mod session;
pub mod storage;
pub mod view;

pub use error::{FluxoError, FluxoResult};
