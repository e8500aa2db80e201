//! User settings for Fluxo
//!
//! Manages the dashboard preferences (base offset, display offset, balance
//! thresholds) and the namespace used to scope transaction collections.

use std::path::PathBuf;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use super::paths::FluxoPaths;
use crate::error::FluxoError;
use crate::models::Money;

/// Connection settings handed to a transaction store
///
/// Built from [`Settings`] and [`FluxoPaths`] and passed explicitly to the
/// store constructors; nothing reads it from global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Application namespace, first segment of every collection path
    pub app_id: String,
    /// Root directory for file-backed collections
    pub data_dir: PathBuf,
}

impl StoreConfig {
    /// Create a store configuration
    pub fn new(app_id: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_id: app_id.into(),
            data_dir: data_dir.into(),
        }
    }
}

/// User settings for Fluxo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Namespace that scopes every user's collections
    #[serde(default = "default_app_id")]
    pub app_id: String,

    /// Starting balance added to the sum of all transactions
    #[serde(default = "default_base_offset")]
    pub base_offset: Money,

    /// Offset from UTC used when rendering dates, in minutes
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,

    /// Currency symbol shown before amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Below this balance the dashboard raises a budget alert
    #[serde(default = "default_low_balance_threshold")]
    pub low_balance_threshold: Money,

    /// Above this balance the dashboard congratulates the user
    #[serde(default = "default_healthy_balance_threshold")]
    pub healthy_balance_threshold: Money,

    /// Name used to address the user in greetings
    #[serde(default = "default_display_name")]
    pub display_name: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_app_id() -> String {
    "fluxo-hackathon".to_string()
}

fn default_base_offset() -> Money {
    Money::from_dollars_cents(3000, 0)
}

fn default_utc_offset_minutes() -> i32 {
    -180 // Brasília
}

fn default_currency() -> String {
    "R$".to_string()
}

fn default_low_balance_threshold() -> Money {
    Money::from_dollars_cents(1000, 0)
}

fn default_healthy_balance_threshold() -> Money {
    Money::from_dollars_cents(3000, 0)
}

fn default_display_name() -> String {
    "João".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            app_id: default_app_id(),
            base_offset: default_base_offset(),
            utc_offset_minutes: default_utc_offset_minutes(),
            currency_symbol: default_currency(),
            low_balance_threshold: default_low_balance_threshold(),
            healthy_balance_threshold: default_healthy_balance_threshold(),
            display_name: default_display_name(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &FluxoPaths) -> Result<Self, FluxoError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| FluxoError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                FluxoError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FluxoPaths) -> Result<(), FluxoError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FluxoError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FluxoError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Check values that cannot be expressed in the type system
    pub fn validate(&self) -> Result<(), FluxoError> {
        if self.app_id.trim().is_empty() {
            return Err(FluxoError::Config("app_id must not be empty".into()));
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
        if !self.app_id.chars().all(allowed) {
            return Err(FluxoError::Config(format!(
                "app_id may only contain letters, digits, '-' and '_': {}",
                self.app_id
            )));
        }
        self.display_offset()?;
        Ok(())
    }

    /// The fixed offset used to render transaction dates
    pub fn display_offset(&self) -> Result<FixedOffset, FluxoError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                FluxoError::Config(format!(
                    "utc_offset_minutes out of range: {}",
                    self.utc_offset_minutes
                ))
            })
    }

    /// Build the store configuration for these settings
    pub fn store_config(&self, paths: &FluxoPaths) -> StoreConfig {
        StoreConfig::new(self.app_id.clone(), paths.data_dir())
    }
}
