//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Minimum password length accepted when setting or changing a password
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 4;

/// How long the inline "incorrect password" message stays visible
pub const DEFAULT_INLINE_ERROR_MS: u64 = 2000;

/// Lock screen label used when the identity lookup fails
pub const DEFAULT_FALLBACK_USERNAME: &str = "User";

/// Dialog and lock screen titles
pub const DEFAULT_LOCK_TITLE: &str = "Vault Locked";
pub const DEFAULT_VERIFY_TITLE: &str = "Confirm Password";

/// Elements that stay usable while the airlock is up: window chrome, the
/// always-available navigation region, and the airlock's own credential input.
pub const DEFAULT_ALLOW_LIST: &[&str] = &[
    "[data-window-control]",
    "[data-always-available]",
    "#airlock-password",
    "#airlock-submit",
];
