//! Balance health banner

use serde::Serialize;

use crate::config::Settings;
use crate::models::{ColorToken, Money};

/// How the dashboard reads the current balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceHealth {
    /// Below the low-balance threshold
    Attention,
    /// Between the thresholds, inclusive
    Neutral,
    /// Above the healthy threshold
    Healthy,
}

/// Thresholds and the name used to address the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingPolicy {
    pub low_balance_threshold: Money,
    pub healthy_balance_threshold: Money,
    pub display_name: String,
}

impl GreetingPolicy {
    pub fn health(&self, balance: Money) -> BalanceHealth {
        if balance < self.low_balance_threshold {
            BalanceHealth::Attention
        } else if balance > self.healthy_balance_threshold {
            BalanceHealth::Healthy
        } else {
            BalanceHealth::Neutral
        }
    }

    /// The bell alert is lit whenever the balance is under the low threshold
    pub fn low_balance_alert(&self, balance: Money) -> bool {
        self.health(balance) == BalanceHealth::Attention
    }

    pub fn loading(&self) -> Greeting {
        Greeting::new("A carregar...", None, ColorToken::Gray)
    }

    pub fn unavailable(&self) -> Greeting {
        Greeting::new(
            "Ação Necessária",
            Some("Verifique as configurações do armazenamento."),
            ColorToken::Red,
        )
    }

    pub fn for_balance(&self, balance: Money) -> Greeting {
        match self.health(balance) {
            BalanceHealth::Attention => Greeting::new(
                format!("Atenção ao orçamento hoje, {}.", self.display_name),
                Some("Seu ritmo de gastos aumentou."),
                ColorToken::Orange,
            ),
            BalanceHealth::Healthy => Greeting::new(
                "As suas finanças estão ótimas!",
                Some("Você está acima da sua meta!"),
                ColorToken::Green,
            ),
            BalanceHealth::Neutral => Greeting::new(
                format!("Olá, {}. Vamos controlar os gastos?", self.display_name),
                Some("Seu ritmo de gastos aumentou."),
                ColorToken::Blue,
            ),
        }
    }
}

impl Default for GreetingPolicy {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for GreetingPolicy {
    fn from(settings: &Settings) -> Self {
        Self {
            low_balance_threshold: settings.low_balance_threshold,
            healthy_balance_threshold: settings.healthy_balance_threshold,
            display_name: settings.display_name.clone(),
        }
    }
}

/// Banner text shown above the balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Greeting {
    pub headline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub color: ColorToken,
}

impl Greeting {
    fn new(headline: impl Into<String>, detail: Option<&str>, color: ColorToken) -> Self {
        Self {
            headline: headline.into(),
            detail: detail.map(str::to_string),
            color,
        }
    }
}
