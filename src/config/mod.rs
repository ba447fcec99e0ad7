//! Configuration module - access gate settings
//!
//! This module provides functionality for:
//! - Loading configuration from ~/.vaultgate/gate.json
//! - Default values for all settings
//! - Type definitions for config structures
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - Configuration struct definitions
//! - `loader` - File system loading and parsing

mod defaults;
mod loader;
mod types;

pub use defaults::{DEFAULT_ALLOW_LIST, DEFAULT_MIN_PASSWORD_LENGTH};

pub use types::GateConfig;

pub use loader::{default_config_path, load_config};

#[cfg(test)]
pub use defaults::{DEFAULT_FALLBACK_USERNAME, DEFAULT_INLINE_ERROR_MS, DEFAULT_LOCK_TITLE};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
