//! View model construction
//!
//! Combines a transaction with its classification and the date/amount
//! strings the dashboard shows. Dates are rendered as `dd/mm` in a fixed
//! UTC offset chosen at construction, so output never depends on the host
//! clock or locale.

use chrono::{FixedOffset, Offset, Utc};
use serde::Serialize;

use crate::models::{Classification, Direction, Money, Transaction};

/// A transaction ready for display
///
/// Rebuilt on every aggregation pass and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedTransaction {
    pub transaction: Transaction,
    pub classification: Classification,
    /// Day and month, e.g. `25/10`
    pub formatted_date: String,
    /// Signed absolute amount, e.g. `- R$ 24,90`
    pub amount_label: String,
}

impl EnrichedTransaction {
    pub fn direction(&self) -> Direction {
        self.transaction.direction
    }

    pub fn amount(&self) -> Money {
        self.transaction.amount
    }
}

/// Builds [`EnrichedTransaction`]s with a fixed display offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModelBuilder {
    offset: FixedOffset,
    currency_symbol: String,
}

impl ViewModelBuilder {
    pub fn new(offset: FixedOffset, currency_symbol: impl Into<String>) -> Self {
        Self {
            offset,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Enrich a transaction; pure and total
    pub fn build(
        &self,
        transaction: &Transaction,
        classification: Classification,
    ) -> EnrichedTransaction {
        EnrichedTransaction {
            formatted_date: self.format_date(transaction),
            amount_label: self.format_amount(transaction),
            transaction: transaction.clone(),
            classification,
        }
    }

    fn format_date(&self, transaction: &Transaction) -> String {
        transaction
            .timestamp
            .with_timezone(&self.offset)
            .format("%d/%m")
            .to_string()
    }

    // Sign follows the recorded direction, magnitude the amount
    fn format_amount(&self, transaction: &Transaction) -> String {
        let sign = match transaction.direction {
            Direction::In => '+',
            Direction::Out => '-',
        };
        format!(
            "{} {}",
            sign,
            transaction.amount.abs().format_with_symbol(&self.currency_symbol)
        )
    }
}

impl Default for ViewModelBuilder {
    /// Brasília time, reais
    fn default() -> Self {
        let offset = FixedOffset::west_opt(3 * 3600).unwrap_or_else(|| Utc.fix());
        Self::new(offset, "R$")
    }
}
