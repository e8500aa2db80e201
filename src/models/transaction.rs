//! Transaction model
//!
//! Transactions are created outside the engine (seed writes or real
//! ingestion) and delivered read-only inside snapshots. The stored document
//! keeps the statement's field names (`raw`, `date`, `type`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::TransactionId;
use super::money::Money;

/// Direction of a transaction, as recorded by the statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money coming into the account
    In,
    /// Money leaving the account
    Out,
}

impl Direction {
    /// Parse a direction from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "in" | "entrada" | "credit" => Some(Self::In),
            "out" | "saida" | "saída" | "debit" => Some(Self::Out),
            _ => None,
        }
    }

    /// The direction implied by the sign of an amount (zero counts as inflow)
    pub fn from_amount(amount: Money) -> Self {
        if amount.is_negative() {
            Self::Out
        } else {
            Self::In
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => write!(f, "in"),
            Self::Out => write!(f, "out"),
        }
    }
}

/// A transaction document before the store has assigned it an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Free-text statement line
    #[serde(rename = "raw")]
    pub raw_descriptor: String,

    /// Signed amount (negative for outflow)
    pub amount: Money,

    /// When the transaction occurred
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,

    /// Recorded direction; not guaranteed to agree with the amount sign
    #[serde(rename = "type")]
    pub direction: Direction,
}

impl NewTransaction {
    pub fn new(
        raw_descriptor: impl Into<String>,
        amount: Money,
        timestamp: DateTime<Utc>,
        direction: Direction,
    ) -> Self {
        Self {
            raw_descriptor: raw_descriptor.into(),
            amount,
            timestamp,
            direction,
        }
    }

    /// Attach a store-assigned id
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            raw_descriptor: self.raw_descriptor,
            amount: self.amount,
            timestamp: self.timestamp,
            direction: self.direction,
        }
    }
}

/// A stored transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, assigned by the store
    pub id: TransactionId,

    #[serde(rename = "raw")]
    pub raw_descriptor: String,

    pub amount: Money,

    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,

    #[serde(rename = "type")]
    pub direction: Direction,
}

impl Transaction {
    /// True when the recorded direction disagrees with the amount sign
    ///
    /// Zero amounts agree with either direction.
    pub fn direction_mismatch(&self) -> bool {
        match self.direction {
            Direction::In => self.amount.is_negative(),
            Direction::Out => self.amount.is_positive(),
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.timestamp.format("%Y-%m-%d"),
            self.raw_descriptor,
            self.amount,
            self.direction
        )
    }
}
