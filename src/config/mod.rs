//! Configuration module for Fluxo
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - User settings persistence
//! - The store configuration injected into storage backends

pub mod paths;
pub mod settings;

pub use paths::FluxoPaths;
pub use settings::{Settings, StoreConfig};
