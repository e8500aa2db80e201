//! Classification model
//!
//! A classification is the display label a rule assigns to a transaction.
//! It is derived on every pass and never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Icon shown next to a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Car,
    Coffee,
    ShoppingBag,
    Home,
    ArrowDownLeft,
    CreditCard,
}

impl Icon {
    /// Icon-set identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Coffee => "coffee",
            Self::ShoppingBag => "shopping-bag",
            Self::Home => "home",
            Self::ArrowDownLeft => "arrow-down-left",
            Self::CreditCard => "credit-card",
        }
    }

    /// Single-glyph stand-in for terminals
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Car => "🚗",
            Self::Coffee => "☕",
            Self::ShoppingBag => "🛍",
            Self::Home => "🏠",
            Self::ArrowDownLeft => "↙",
            Self::CreditCard => "💳",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Color token used to tint a transaction's badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Blue,
    Orange,
    Purple,
    Red,
    Green,
    Gray,
}

impl ColorToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Orange => "orange",
            Self::Purple => "purple",
            Self::Red => "red",
            Self::Green => "green",
            Self::Gray => "gray",
        }
    }

    /// Background class for the badge (`bg-blue-100`)
    pub fn background(&self) -> String {
        format!("bg-{}-100", self.as_str())
    }

    /// Foreground class for the icon (`text-blue-500`)
    pub fn foreground(&self) -> String {
        format!("text-{}-500", self.as_str())
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category and presentation assigned to a transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    /// Open-ended category label ("Transporte", "Casa", ...)
    pub category: String,

    /// Name shown in place of the raw descriptor
    pub display_name: String,

    pub icon: Icon,

    pub color: ColorToken,
}

impl Classification {
    pub fn new(
        category: impl Into<String>,
        display_name: impl Into<String>,
        icon: Icon,
        color: ColorToken,
    ) -> Self {
        Self {
            category: category.into(),
            display_name: display_name.into(),
            icon,
            color,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_classes() {
        assert_eq!(ColorToken::Blue.background(), "bg-blue-100");
        assert_eq!(ColorToken::Gray.foreground(), "text-gray-500");
    }

    #[test]
    fn test_icon_serialization() {
        let json = serde_json::to_string(&Icon::ShoppingBag).unwrap();
        assert_eq!(json, "\"shopping-bag\"");
        assert_eq!(Icon::ArrowDownLeft.as_str(), "arrow-down-left");
    }

    #[test]
    fn test_display() {
        let c = Classification::new("Casa", "Aluguel Mensal", Icon::Home, ColorToken::Red);
        assert_eq!(c.to_string(), "Aluguel Mensal (Casa)");
    }
}
