//! Configuration type definitions

use serde::{Deserialize, Serialize};

use super::defaults::*;
use crate::interceptor::AllowList;

/// Access gate configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateConfig {
    /// Minimum password length (default: 4)
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
    /// Display window for the inline "incorrect password" message in ms (default: 2000)
    #[serde(default = "default_inline_error_ms")]
    pub inline_error_ms: u64,
    /// Lock screen name when the identity lookup fails (default: "User")
    #[serde(default = "default_fallback_username")]
    pub fallback_username: String,
    #[serde(default = "default_lock_title")]
    pub lock_title: String,
    #[serde(default = "default_verify_title")]
    pub verify_title: String,
    /// Selectors exempt from interception while locked
    #[serde(default = "default_allow_list")]
    pub allow_list: Vec<String>,
}

fn default_min_password_length() -> usize {
    DEFAULT_MIN_PASSWORD_LENGTH
}
fn default_inline_error_ms() -> u64 {
    DEFAULT_INLINE_ERROR_MS
}
fn default_fallback_username() -> String {
    DEFAULT_FALLBACK_USERNAME.to_string()
}
fn default_lock_title() -> String {
    DEFAULT_LOCK_TITLE.to_string()
}
fn default_verify_title() -> String {
    DEFAULT_VERIFY_TITLE.to_string()
}
fn default_allow_list() -> Vec<String> {
    DEFAULT_ALLOW_LIST.iter().map(|s| s.to_string()).collect()
}

impl Default for GateConfig {
    fn default() -> Self {
        GateConfig {
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            inline_error_ms: DEFAULT_INLINE_ERROR_MS,
            fallback_username: default_fallback_username(),
            lock_title: default_lock_title(),
            verify_title: default_verify_title(),
            allow_list: default_allow_list(),
        }
    }
}

impl GateConfig {
    /// Parsed allow-list; unsupported selectors are dropped.
    pub fn allow_list(&self) -> AllowList {
        AllowList::parse(&self.allow_list)
    }

    pub fn inline_error_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.inline_error_ms)
    }
}
