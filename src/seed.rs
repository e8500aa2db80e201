//! Demo data loader
//!
//! Writes a fixed set of sample statement lines into a user's collection so
//! an empty dashboard has something to show. Loading is not idempotent:
//! every call adds a fresh copy of the templates.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::error::FluxoResult;
use crate::models::{Direction, Money, NewTransaction, TransactionId};
use crate::storage::{CollectionScope, TransactionStore};

/// Outcome of a successful seed write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Ids assigned by the store, in template order
    pub ids: Vec<TransactionId>,
}

impl SeedReport {
    pub fn count(&self) -> usize {
        self.ids.len()
    }
}

/// The sample statement, dated relative to `now`
///
/// Three entries are recent; the rent and marketplace entries keep their
/// historical dates.
pub fn template_set(now: DateTime<Utc>) -> Vec<NewTransaction> {
    vec![
        NewTransaction::new(
            "PGTO *UBER DO BRASIL TEC",
            Money::from_cents(-2490),
            now,
            Direction::Out,
        ),
        NewTransaction::new(
            "TRANSF PIX RECEBIDA - JOAO SILVA",
            Money::from_cents(15_000),
            now - Duration::days(1),
            Direction::In,
        ),
        NewTransaction::new(
            "COMPRA CARTAO - PADARIA ESTRELA",
            Money::from_cents(-1250),
            now - Duration::days(2),
            Direction::Out,
        ),
        NewTransaction::new(
            "PAGAMENTO BOLETO - ALUGUEL IMOB",
            Money::from_cents(-120_000),
            fixed_date(2023, 10, 25, 10, 0),
            Direction::Out,
        ),
        NewTransaction::new(
            "COMPRA MKTPLACE - AMAZON SERV",
            Money::from_cents(-18_990),
            fixed_date(2023, 10, 24, 14, 30),
            Direction::Out,
        ),
    ]
}

fn fixed_date(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

/// Write `templates` into the collection as one atomic batch
///
/// On failure nothing is written; the error is logged and returned without
/// retrying. Successful writes are recorded in the audit log when one is
/// given.
pub fn seed(
    store: &dyn TransactionStore,
    scope: &CollectionScope,
    templates: Vec<NewTransaction>,
    audit: Option<&AuditLogger>,
) -> FluxoResult<SeedReport> {
    let documents = templates.clone();

    let ids = match store.commit_batch(scope, templates) {
        Ok(ids) => ids,
        Err(e) => {
            log::error!("Seed write to {} failed: {}", scope, e);
            return Err(e);
        }
    };

    log::info!("Seeded {} transaction(s) into {}", ids.len(), scope);

    if let Some(logger) = audit {
        let entries: Vec<AuditEntry> = ids
            .iter()
            .zip(&documents)
            .map(|(id, doc)| {
                AuditEntry::create(
                    EntityType::Transaction,
                    id.to_string(),
                    Some(doc.raw_descriptor.clone()),
                    &doc.clone().into_transaction(*id),
                )
            })
            .collect();

        // The records are already committed; an audit failure is not a seed failure
        if let Err(e) = logger.log_batch(&entries) {
            log::warn!("Failed to write seed audit entries: {}", e);
        }
    }

    Ok(SeedReport { ids })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::config::StoreConfig;
    use crate::error::FluxoError;
    use crate::models::UserId;
    use crate::storage::MemoryStore;
    use tempfile::TempDir;

    fn setup() -> (MemoryStore, CollectionScope) {
        let store = MemoryStore::new(StoreConfig::new("fluxo-test", "/unused"));
        let scope = CollectionScope::new("fluxo-test", UserId::new());
        (store, scope)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_template_dates() {
        let templates = template_set(now());
        let dates: Vec<_> = templates.iter().map(|t| t.timestamp).collect();
        assert_eq!(
            dates,
            vec![
                now(),
                now() - Duration::days(1),
                now() - Duration::days(2),
                Utc.with_ymd_and_hms(2023, 10, 25, 10, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2023, 10, 24, 14, 30, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn test_template_amounts_agree_with_direction() {
        assert!(template_set(now())
            .into_iter()
            .all(|t| Direction::from_amount(t.amount) == t.direction));
    }

    #[test]
    fn test_seed_writes_all_templates() {
        let (store, scope) = setup();
        let report = seed(&store, &scope, template_set(now()), None).unwrap();

        assert_eq!(report.count(), 5);
        let stored = store.documents(&scope).unwrap();
        assert_eq!(
            stored.iter().map(|t| t.id).collect::<Vec<_>>(),
            report.ids
        );
        assert_eq!(stored[0].raw_descriptor, "PGTO *UBER DO BRASIL TEC");
    }

    #[test]
    fn test_seed_is_not_idempotent() {
        let (store, scope) = setup();
        seed(&store, &scope, template_set(now()), None).unwrap();
        seed(&store, &scope, template_set(now()), None).unwrap();

        let stored = store.documents(&scope).unwrap();
        assert_eq!(stored.len(), 10);

        let balance = aggregate(stored, Money::from_dollars_cents(3000, 0)).balance;
        assert_eq!(balance, Money::from_cents(300_000 - 2 * 127_730));
    }

    #[test]
    fn test_failed_seed_leaves_no_records() {
        let (store, scope) = setup();
        store.fail_next_commit("quota exceeded").unwrap();

        let err = seed(&store, &scope, template_set(now()), None).unwrap_err();
        assert!(matches!(err, FluxoError::Storage(_)));
        assert!(store.documents(&scope).unwrap().is_empty());
    }

    #[test]
    fn test_seed_is_audited() {
        let (store, scope) = setup();
        let temp = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp.path().join("audit.log"));

        let report = seed(&store, &scope, template_set(now()), Some(&logger)).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].entity_id, report.ids[0].to_string());
        assert_eq!(
            entries[0].entity_name.as_deref(),
            Some("PGTO *UBER DO BRASIL TEC")
        );
    }

    #[test]
    fn test_empty_template_set() {
        let (store, scope) = setup();
        let report = seed(&store, &scope, Vec::new(), None).unwrap();
        assert_eq!(report.count(), 0);
    }
}
