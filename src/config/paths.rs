//! Path management for Fluxo
//!
//! ## Path Resolution Order
//!
//! 1. `FLUXO_DATA_DIR` environment variable (if set)
//! 2. The platform config directory reported by `directories`
//!    (`~/.config/fluxo` on Linux, `%APPDATA%\fluxo` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::FluxoError;

/// Manages all paths used by Fluxo
#[derive(Debug, Clone)]
pub struct FluxoPaths {
    /// Base directory for all Fluxo data
    base_dir: PathBuf,
}

impl FluxoPaths {
    /// Create a new FluxoPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, FluxoError> {
        let base_dir = if let Ok(custom) = std::env::var("FLUXO_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create FluxoPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory, root of the transaction collections
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to users.json (registered identities and profiles)
    pub fn users_file(&self) -> PathBuf {
        self.base_dir.join("users.json")
    }

    /// Get the path to session.json (currently signed-in identity)
    pub fn session_file(&self) -> PathBuf {
        self.base_dir.join("session.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), FluxoError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FluxoError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| FluxoError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, FluxoError> {
    ProjectDirs::from("", "", "fluxo")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| FluxoError::Config("Could not determine config directory".into()))
}
