//! Configuration loading from file system

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use super::types::GateConfig;

/// Get the default config path (~/.vaultgate/gate.json)
pub fn default_config_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde("~/.vaultgate/gate.json").as_ref())
}

/// Load configuration from `path`.
///
/// Returns GateConfig::default() if the file is missing or cannot be parsed.
#[instrument(name = "load_config", skip_all, fields(path = %path.display()))]
pub fn load_config(path: &Path) -> GateConfig {
    if !path.exists() {
        info!("Config file not found, using defaults");
        return GateConfig::default();
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(error = %e, "Failed to read config, using defaults");
            return GateConfig::default();
        }
    };

    match serde_json::from_str::<GateConfig>(&content) {
        Ok(config) => {
            if config.min_password_length == 0 {
                warn!("minPasswordLength of 0 disables the length check");
            }
            info!("Successfully loaded config");
            config
        }
        Err(e) => {
            warn!(error = %e, "Failed to parse config JSON, using defaults");
            GateConfig::default()
        }
    }
}
