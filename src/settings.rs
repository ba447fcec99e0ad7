//! Settings document boundary.
//!
//! The gate only reads and writes `passwordHash`; everything else in the
//! document belongs to the host application and is carried through untouched.
//!
//! Stored in ~/.vaultgate/settings.json when the file-backed store is used.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use serde_json::Value;
use tracing::{debug, warn};

/// Error that can occur when reading or writing the settings document.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings store unavailable: {0}")]
    Unavailable(String),
    #[error("settings document is not a JSON object")]
    NotAnObject,
}

const PASSWORD_HASH_KEY: &str = "passwordHash";

/// Persisted settings snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// SHA-256 digest of the current password, 64 lower-case hex characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// Idle minutes before the host's auto-lock policy calls `lock()`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_lock_timeout: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Partial update applied by [`SettingsStore::update`].
///
/// - `None` = leave the field alone
/// - `Some(None)` = clear it
/// - `Some(Some(v))` = set it
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsPatch {
    pub password_hash: Option<Option<String>>,
    pub auto_lock_timeout: Option<Option<u64>>,
}

impl SettingsPatch {
    pub fn password_hash(hash: impl Into<String>) -> Self {
        Self {
            password_hash: Some(Some(hash.into())),
            ..Default::default()
        }
    }

    pub fn clear_password_hash() -> Self {
        Self {
            password_hash: Some(None),
            ..Default::default()
        }
    }

    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(hash) = &self.password_hash {
            settings.password_hash = hash.clone();
        }
        if let Some(timeout) = self.auto_lock_timeout {
            settings.auto_lock_timeout = timeout;
        }
    }
}

/// Key-value settings document owned by the host application.
pub trait SettingsStore: Send + Sync {
    fn get(&self) -> Result<Settings, SettingsError>;
    /// Apply `patch` and return the persisted snapshot.
    fn update(&self, patch: SettingsPatch) -> Result<Settings, SettingsError>;
}

/// Settings held in process memory.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<Settings>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self) -> Result<Settings, SettingsError> {
        Ok(self.settings.lock().clone())
    }

    fn update(&self, patch: SettingsPatch) -> Result<Settings, SettingsError> {
        let mut settings = self.settings.lock();
        patch.apply_to(&mut settings);
        Ok(settings.clone())
    }
}

/// Settings persisted as a pretty-printed JSON file.
#[derive(Debug)]
pub struct JsonSettingsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Settings, SettingsError> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }
        settings_from_value(serde_json::from_str(&content)?)
    }
}

/// Decode a settings document.
///
/// `passwordHash` is read on its own, so a host-written field of the wrong
/// type cannot hide the credential. When the typed decode fails, the other
/// keys are carried through `extra` untouched.
fn settings_from_value(value: Value) -> Result<Settings, SettingsError> {
    let Value::Object(mut map) = value else {
        return Err(SettingsError::NotAnObject);
    };
    match serde_json::from_value::<Settings>(Value::Object(map.clone())) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            warn!(error = %e, "Settings document has unexpected field types, keeping raw values");
            let password_hash = match map.remove(PASSWORD_HASH_KEY) {
                None | Some(Value::Null) => None,
                Some(Value::String(hash)) => Some(hash),
                // Never verifies, but still counts as protected
                Some(other) => Some(other.to_string()),
            };
            Ok(Settings {
                password_hash,
                auto_lock_timeout: None,
                extra: map,
            })
        }
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get(&self) -> Result<Settings, SettingsError> {
        self.load()
    }

    fn update(&self, patch: SettingsPatch) -> Result<Settings, SettingsError> {
        let _guard = self.write_lock.lock();
        let mut settings = self.load()?;
        patch.apply_to(&mut settings);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&settings)?;

        // Atomic write: temp file then rename
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        debug!(path = %self.path.display(), "Settings written");
        Ok(settings)
    }
}

/// Get the default path for the settings document.
pub fn default_settings_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde("~/.vaultgate/settings.json").as_ref())
}
