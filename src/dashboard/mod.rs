//! Dashboard computation
//!
//! [`DashboardEngine`] turns one snapshot into a [`DashboardState`]:
//! aggregate, then classify and enrich every entry. Each call starts from
//! scratch.

pub mod greeting;
pub mod state;

pub use greeting::{BalanceHealth, Greeting, GreetingPolicy};
pub use state::DashboardState;

use crate::aggregate::aggregate;
use crate::classify::RuleMatcher;
use crate::config::Settings;
use crate::error::FluxoResult;
use crate::models::{Money, Transaction};
use crate::view::ViewModelBuilder;

/// Everything needed to render a snapshot
#[derive(Debug, Clone)]
pub struct DashboardEngine {
    matcher: RuleMatcher,
    builder: ViewModelBuilder,
    base_offset: Money,
}

impl DashboardEngine {
    pub fn new(matcher: RuleMatcher, builder: ViewModelBuilder, base_offset: Money) -> Self {
        Self {
            matcher,
            builder,
            base_offset,
        }
    }

    /// Built-in rules with display options from settings
    pub fn from_settings(settings: &Settings) -> FluxoResult<Self> {
        Ok(Self::new(
            RuleMatcher::default(),
            ViewModelBuilder::new(settings.display_offset()?, settings.currency_symbol.clone()),
            settings.base_offset,
        ))
    }

    pub fn matcher(&self) -> &RuleMatcher {
        &self.matcher
    }

    pub fn base_offset(&self) -> Money {
        self.base_offset
    }

    /// Full recompute for one snapshot
    pub fn render(&self, transactions: Vec<Transaction>) -> DashboardState {
        let aggregation = aggregate(transactions, self.base_offset);
        DashboardState::Ready {
            entries: aggregation.enrich(&self.matcher, &self.builder),
            balance: aggregation.balance,
        }
    }
}

impl Default for DashboardEngine {
    fn default() -> Self {
        Self::new(
            RuleMatcher::default(),
            ViewModelBuilder::default(),
            Settings::default().base_offset,
        )
    }
}
