//! Vault Gate - access gate and input interception for a desktop vault
//!
//! This library keeps a vault application locked behind a password:
//! - `credentials` - SHA-256 fingerprint of the password in the settings document
//! - `shortcuts` - scoped keyboard shortcut registry with a master switch
//! - `interceptor` - capture-phase input blocking ("airlock") with an allow-list
//! - `session` - lock state machine tying the pieces together
//!
//! The host application supplies the UI through the traits in `session`
//! and `interceptor`, and feeds input events through
//! [`Airlock`](interceptor::Airlock) and [`ShortcutRegistry`](shortcuts::ShortcutRegistry).

pub mod config;
pub mod credentials;
pub mod error;
pub mod input;
pub mod interceptor;
pub mod logging;
pub mod session;
pub mod settings;
pub mod shortcuts;

#[cfg(test)]
mod testing;

pub use config::GateConfig;
pub use error::{GateError, ValidationError};
pub use session::{GateRequest, LockState, SessionLock};
pub use shortcuts::ShortcutRegistry;
