//! Credential fingerprint storage.
//!
//! The password is never persisted; only its SHA-256 digest (hex-encoded) is
//! written to the settings document. The digest is unsalted: the gate targets a
//! single user on a local machine, and a salt would not change that threat
//! model. This is a known limitation.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{error, info};

use crate::settings::{SettingsError, SettingsPatch, SettingsStore};

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Compute the hex-encoded SHA-256 digest of a password's UTF-8 bytes.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// What the settings document says about the credential.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Cached {
    Absent,
    Hash(String),
    /// The document could not be read. Treated as protected with a
    /// credential nothing matches.
    Unreadable,
}

impl From<Option<String>> for Cached {
    fn from(hash: Option<String>) -> Self {
        hash.map_or(Cached::Absent, Cached::Hash)
    }
}

/// Owns the cached copy of the persisted password hash.
pub struct CredentialStore {
    settings: Arc<dyn SettingsStore>,
    cached: Cached,
}

impl CredentialStore {
    /// Load the current hash from `settings`.
    ///
    /// A settings document that cannot be read keeps the gate closed: every
    /// password is rejected until the document is readable again.
    pub fn load(settings: Arc<dyn SettingsStore>) -> Self {
        let cached: Cached = match settings.get() {
            Ok(snapshot) => snapshot.password_hash.into(),
            Err(e) => {
                error!(error = %e, "Failed to read settings, refusing every password");
                Cached::Unreadable
            }
        };
        Self { settings, cached }
    }

    pub fn has_credential(&self) -> bool {
        self.cached != Cached::Absent
    }

    /// Check `password` against the stored hash.
    ///
    /// Returns true when no credential is configured.
    pub fn verify(&self, password: &str) -> bool {
        match &self.cached {
            Cached::Absent => true,
            Cached::Hash(stored) => hash_password(password) == *stored,
            Cached::Unreadable => false,
        }
    }

    /// Persist the hash of `password`. The cache only changes once the write
    /// has succeeded.
    pub fn set(&mut self, password: &str) -> Result<(), SettingsError> {
        let hash = hash_password(password);
        let snapshot = self.settings.update(SettingsPatch::password_hash(hash))?;
        self.cached = snapshot.password_hash.into();
        info!(event_type = "credential", action = "set", "Password hash stored");
        Ok(())
    }

    pub fn remove(&mut self) -> Result<(), SettingsError> {
        let snapshot = self.settings.update(SettingsPatch::clear_password_hash())?;
        self.cached = snapshot.password_hash.into();
        info!(event_type = "credential", action = "remove", "Password hash cleared");
        Ok(())
    }

    /// Idle minutes configured for the host's auto-lock policy.
    pub fn auto_lock_timeout(&self) -> Option<u64> {
        self.settings.get().ok().and_then(|s| s.auto_lock_timeout)
    }
}
