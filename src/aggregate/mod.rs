//! Balance aggregation
//!
//! Every snapshot is re-sorted and re-summed from scratch; nothing is carried
//! over between passes.

use crate::classify::RuleMatcher;
use crate::models::{Money, Transaction};
use crate::view::{EnrichedTransaction, ViewModelBuilder};

/// Display-ordered transactions and the balance they produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Newest first; equal timestamps ordered by id ascending
    pub transactions: Vec<Transaction>,
    /// Base offset plus the sum of every amount
    pub balance: Money,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Classify and enrich every transaction, keeping display order
    pub fn enrich(
        &self,
        matcher: &RuleMatcher,
        builder: &ViewModelBuilder,
    ) -> Vec<EnrichedTransaction> {
        self.transactions
            .iter()
            .map(|txn| {
                let classification = matcher.classify(&txn.raw_descriptor, txn.direction);
                builder.build(txn, classification)
            })
            .collect()
    }
}

/// Sort a snapshot for display and compute its balance
pub fn aggregate(mut transactions: Vec<Transaction>, base_offset: Money) -> Aggregation {
    transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(a.id.cmp(&b.id)));

    let mismatched = transactions.iter().filter(|t| t.direction_mismatch()).count();
    if mismatched > 0 {
        log::warn!(
            "{} transaction(s) have a direction that disagrees with the amount sign",
            mismatched
        );
    }

    let balance = base_offset + transactions.iter().map(|t| t.amount).sum::<Money>();

    Aggregation {
        transactions,
        balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, NewTransaction, TransactionId};
    use crate::seed::template_set;
    use chrono::{DateTime, TimeZone, Utc};
    use uuid::Uuid;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 10, day, hour, 0, 0).unwrap()
    }

    fn txn(id: u128, cents: i64, timestamp: DateTime<Utc>) -> Transaction {
        NewTransaction::new("X", Money::from_cents(cents), timestamp, Direction::Out)
            .into_transaction(TransactionId::from_uuid(Uuid::from_u128(id)))
    }

    fn base() -> Money {
        Money::from_dollars_cents(3000, 0)
    }

    #[test]
    fn test_empty_set_balance_is_base_offset() {
        let result = aggregate(Vec::new(), base());
        assert!(result.is_empty());
        assert_eq!(result.balance, base());
    }

    #[test]
    fn test_seed_template_balance() {
        let docs = template_set(Utc::now());
        let transactions = docs
            .into_iter()
            .map(|d| d.into_transaction(TransactionId::new()))
            .collect();

        let result = aggregate(transactions, base());
        assert_eq!(result.balance, Money::from_cents(172_270));
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_sorted_newest_first() {
        let result = aggregate(
            vec![txn(1, -100, at(1, 9)), txn(2, -100, at(3, 9)), txn(3, -100, at(2, 9))],
            Money::zero(),
        );
        let order: Vec<_> = result.transactions.iter().map(|t| t.timestamp).collect();
        assert_eq!(order, vec![at(3, 9), at(2, 9), at(1, 9)]);
    }

    #[test]
    fn test_ties_broken_by_id_ascending() {
        let same = at(5, 12);
        let result = aggregate(
            vec![txn(30, -1, same), txn(10, -1, same), txn(20, -1, at(6, 0)), txn(20, -1, same)],
            Money::zero(),
        );
        let ids: Vec<u128> = result
            .transactions
            .iter()
            .map(|t| t.id.as_uuid().as_u128())
            .collect();
        assert_eq!(ids, vec![20, 10, 20, 30]);
    }

    #[test]
    fn test_order_independent_of_input_order() {
        let a = vec![txn(1, -1, at(2, 0)), txn(2, -1, at(2, 0)), txn(3, -1, at(1, 0))];
        let mut b = a.clone();
        b.reverse();
        assert_eq!(aggregate(a, base()), aggregate(b, base()));
    }

    #[test]
    fn test_balance_uses_amount_not_direction() {
        let mut inflow_marked_out = txn(1, 5000, at(1, 0));
        inflow_marked_out.direction = Direction::Out;
        let result = aggregate(vec![inflow_marked_out], Money::zero());
        assert_eq!(result.balance, Money::from_cents(5000));
    }

    #[test]
    fn test_balance_is_additive() {
        let set = vec![txn(1, 123, at(1, 0)), txn(2, -456, at(2, 0)), txn(3, 789, at(3, 0))];
        let result = aggregate(set, Money::from_cents(10));
        assert_eq!(result.balance, Money::from_cents(10 + 123 - 456 + 789));
    }

    #[test]
    fn test_enrich_keeps_display_order() {
        let mut early = txn(1, -2490, at(1, 0));
        early.raw_descriptor = "PGTO *UBER".into();
        let mut late = txn(2, 15_000, at(2, 0));
        late.raw_descriptor = "PIX RECEBIDO".into();
        late.direction = Direction::In;

        let result = aggregate(vec![early, late], base());
        let enriched = result.enrich(&RuleMatcher::default(), &ViewModelBuilder::default());

        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[0].classification.category, "Entrada");
        assert_eq!(enriched[1].classification.category, "Transporte");
    }
}
