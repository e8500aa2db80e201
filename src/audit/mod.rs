//! Audit trail for Fluxo
//!
//! Seed writes and account activity (sign-up, sign-in, sign-out) are
//! appended to a line-delimited JSON log. The log is never rewritten.
//!
//! ```rust,ignore
//! use fluxo::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(
//!     EntityType::Transaction,
//!     id.to_string(),
//!     Some(txn.raw_descriptor.clone()),
//!     &txn,
//! ))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
