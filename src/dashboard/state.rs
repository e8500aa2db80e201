//! What the dashboard is showing

use serde::Serialize;

use super::greeting::{Greeting, GreetingPolicy};
use crate::models::Money;
use crate::view::EnrichedTransaction;

/// Dashboard state for the current identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DashboardState {
    /// Nobody is signed in
    SignedOut,
    /// Subscribed, first snapshot not yet delivered
    Loading,
    /// Latest snapshot, enriched and summed
    Ready {
        entries: Vec<EnrichedTransaction>,
        balance: Money,
    },
    /// The transaction stream failed; nothing is shown
    Unavailable { message: String },
}

impl DashboardState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Entries in display order; empty unless ready
    pub fn entries(&self) -> &[EnrichedTransaction] {
        match self {
            Self::Ready { entries, .. } => entries,
            _ => &[],
        }
    }

    pub fn balance(&self) -> Option<Money> {
        match self {
            Self::Ready { balance, .. } => Some(*balance),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Unavailable { message } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Seeding is offered only for a loaded, empty collection
    pub fn can_seed(&self) -> bool {
        matches!(self, Self::Ready { entries, .. } if entries.is_empty())
    }

    pub fn low_balance_alert(&self, policy: &GreetingPolicy) -> bool {
        self.balance()
            .map(|b| policy.low_balance_alert(b))
            .unwrap_or(false)
    }

    /// Banner for this state; `None` when signed out
    pub fn greeting(&self, policy: &GreetingPolicy) -> Option<Greeting> {
        match self {
            Self::SignedOut => None,
            Self::Loading => Some(policy.loading()),
            Self::Unavailable { .. } => Some(policy.unavailable()),
            Self::Ready { balance, .. } => Some(policy.for_balance(*balance)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(balance: i64) -> DashboardState {
        DashboardState::Ready {
            entries: Vec::new(),
            balance: Money::from_cents(balance),
        }
    }

    #[test]
    fn test_can_seed_only_when_ready_and_empty() {
        assert!(ready(300_000).can_seed());
        assert!(!DashboardState::Loading.can_seed());
        assert!(!DashboardState::SignedOut.can_seed());
        assert!(!DashboardState::Unavailable {
            message: "denied".into()
        }
        .can_seed());
    }

    #[test]
    fn test_unavailable_shows_nothing() {
        let state = DashboardState::Unavailable {
            message: "permission denied".into(),
        };
        assert!(state.entries().is_empty());
        assert_eq!(state.balance(), None);
        assert_eq!(state.error(), Some("permission denied"));
        assert!(!state.is_loading());
    }

    #[test]
    fn test_greeting_per_state() {
        let policy = GreetingPolicy::default();
        assert_eq!(DashboardState::SignedOut.greeting(&policy), None);
        assert_eq!(
            DashboardState::Loading.greeting(&policy).unwrap().headline,
            "A carregar..."
        );
        assert_eq!(
            ready(500_000).greeting(&policy).unwrap().headline,
            "As suas finanças estão ótimas!"
        );
    }

    #[test]
    fn test_alert_needs_a_balance() {
        let policy = GreetingPolicy::default();
        assert!(ready(10).low_balance_alert(&policy));
        assert!(!DashboardState::Loading.low_balance_alert(&policy));
    }

    #[test]
    fn test_serialized_tag() {
        let json = serde_json::to_value(ready(100)).unwrap();
        assert_eq!(json["state"], "ready");
        assert_eq!(json["balance"], 100);
    }
}
