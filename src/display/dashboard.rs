//! Dashboard formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::dashboard::{DashboardState, Greeting, GreetingPolicy};
use crate::models::{Classification, Money};
use crate::view::EnrichedTransaction;

#[derive(Tabled)]
struct StatementRow {
    #[tabled(rename = "Data")]
    date: String,
    #[tabled(rename = "Descrição")]
    name: String,
    #[tabled(rename = "Categoria")]
    category: String,
    #[tabled(rename = "Valor")]
    amount: String,
}

impl From<&EnrichedTransaction> for StatementRow {
    fn from(entry: &EnrichedTransaction) -> Self {
        Self {
            date: entry.formatted_date.clone(),
            name: entry.classification.display_name.clone(),
            category: entry.classification.category.clone(),
            amount: entry.amount_label.clone(),
        }
    }
}

/// Statement table, newest first
pub fn format_statement(entries: &[EnrichedTransaction]) -> String {
    if entries.is_empty() {
        return concat!(
            "Nenhuma transação encontrada.\n",
            "Execute `fluxo seed` para carregar dados de demonstração.\n"
        )
        .to_string();
    }

    let mut table = Table::new(entries.iter().map(StatementRow::from));
    table
        .with(Style::rounded())
        .modify(Columns::single(3), Alignment::right());
    format!("{}\n", table)
}

/// Banner line plus detail
pub fn format_greeting(greeting: &Greeting) -> String {
    match &greeting.detail {
        Some(detail) => format!("{}\n  {}\n", greeting.headline, detail),
        None => format!("{}\n", greeting.headline),
    }
}

/// Balance line
pub fn format_balance(balance: Money, currency_symbol: &str) -> String {
    format!("Saldo Disponível: {}\n", balance.format_with_symbol(currency_symbol))
}

/// Whole dashboard for the signed-in user
pub fn format_dashboard(
    state: &DashboardState,
    policy: &GreetingPolicy,
    currency_symbol: &str,
) -> String {
    let Some(greeting) = state.greeting(policy) else {
        return "Não autenticado. Execute `fluxo signin` ou `fluxo signup`.\n".to_string();
    };

    let mut output = String::new();
    let bell = if state.low_balance_alert(policy) {
        " [!]"
    } else {
        ""
    };
    output.push_str(&format!(
        "Bem-vindo de volta, {}{}\n\n",
        policy.display_name, bell
    ));
    output.push_str(&format_greeting(&greeting));
    output.push('\n');

    match state {
        DashboardState::Ready { entries, balance } => {
            output.push_str(&format_balance(*balance, currency_symbol));
            output.push_str("\nÚltimas Atividades\n");
            output.push_str(&format_statement(entries));
        }
        DashboardState::Unavailable { message } => {
            output.push_str(&format!("Erro ao ler transações: {}\n", message));
        }
        DashboardState::Loading | DashboardState::SignedOut => {
            output.push_str("A carregar...\n");
        }
    }

    output
}

/// Result of classifying a single descriptor
pub fn format_classification(descriptor: &str, classification: &Classification) -> String {
    format!(
        "{}\n  Categoria: {}\n  Nome:      {}\n  Ícone:     {}\n  Cor:       {}\n",
        descriptor,
        classification.category,
        classification.display_name,
        classification.icon,
        classification.color
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardEngine;
    use crate::models::TransactionId;
    use crate::seed::template_set;
    use chrono::{TimeZone, Utc};

    fn seeded_state() -> DashboardState {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let transactions = template_set(now)
            .into_iter()
            .map(|d| d.into_transaction(TransactionId::new()))
            .collect();
        DashboardEngine::default().render(transactions)
    }

    #[test]
    fn test_statement_table() {
        let output = format_statement(seeded_state().entries());
        assert!(output.contains("Uber Viagens"));
        assert!(output.contains("- R$ 1200,00"));
        assert!(output.contains("+ R$ 150,00"));
        assert!(output.contains("25/10"));
    }

    #[test]
    fn test_empty_statement() {
        assert!(format_statement(&[]).contains("Nenhuma transação encontrada."));
    }

    #[test]
    fn test_dashboard_ready() {
        let output = format_dashboard(&seeded_state(), &GreetingPolicy::default(), "R$");
        assert!(output.contains("Saldo Disponível: R$ 1722,70"));
        assert!(output.contains("Olá, João. Vamos controlar os gastos?"));
        assert!(!output.contains("[!]"));
    }

    #[test]
    fn test_dashboard_low_balance_bell() {
        let state = DashboardState::Ready {
            entries: Vec::new(),
            balance: Money::from_cents(50_000),
        };
        let output = format_dashboard(&state, &GreetingPolicy::default(), "R$");
        assert!(output.contains("[!]"));
        assert!(output.contains("Atenção ao orçamento hoje, João."));
    }

    #[test]
    fn test_dashboard_unavailable() {
        let state = DashboardState::Unavailable {
            message: "permission denied".into(),
        };
        let output = format_dashboard(&state, &GreetingPolicy::default(), "R$");
        assert!(output.contains("Ação Necessária"));
        assert!(output.contains("permission denied"));
        assert!(!output.contains("Saldo"));
    }

    #[test]
    fn test_dashboard_signed_out() {
        let output = format_dashboard(&DashboardState::SignedOut, &GreetingPolicy::default(), "R$");
        assert!(output.contains("fluxo signin"));
    }

    #[test]
    fn test_format_classification() {
        let c = crate::classify::classify("PGTO *UBER", crate::models::Direction::Out);
        let output = format_classification("PGTO *UBER", &c);
        assert!(output.contains("Categoria: Transporte"));
        assert!(output.contains("Ícone:     car"));
    }
}
