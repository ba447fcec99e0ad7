//! Scoped keyboard shortcut dispatch.
//!
//! This module provides:
//! - Chord normalization (`control, alt, shift, meta` + key)
//! - Scope-qualified bindings with most-recent-scope-first routing
//! - A master switch the session controller uses to silence every shortcut
//!   while the vault is locked
//!
//! # Example
//!
//! ```ignore
//! use vault_gate::shortcuts::{HandlerSignal, ShortcutRegistry};
//!
//! let registry = ShortcutRegistry::new();
//! registry.register("ctrl+n", |_| HandlerSignal::Handled, None)?;
//!
//! // A rename field captures Enter locally while it has focus
//! registry.register("enter", |_| HandlerSignal::Handled, Some("rename"))?;
//! registry.enable_scope("rename");
//! ```

mod registry;
mod types;


pub use types::{canonicalize_key, Chord, ShortcutParseError};

pub use registry::{
    DispatchOutcome, HandlerSignal, KeyListenerHost, ShortcutHandler, ShortcutRegistry,
    GLOBAL_SCOPE,
};
