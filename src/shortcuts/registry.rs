//! Scoped shortcut registry.
//!
//! Bindings are keyed by `scope:chord`. Dispatch walks the active scopes from
//! the most recently enabled back to `"global"`, so a scope pushed by a
//! focused widget shadows the global binding for the same chord. One binding
//! fires per event.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::types::{Chord, ShortcutParseError};
use crate::input::{InputEvent, InputKind};

/// Scope that is always active.
pub const GLOBAL_SCOPE: &str = "global";

/// What a handler asks the registry to do with the event afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HandlerSignal {
    /// Suppress default behavior and stop propagation
    #[default]
    Handled,
    /// Let the host's default behavior run
    AllowDefault,
}

/// Result of dispatching one event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Registry is switched off; the event was not inspected
    Disabled,
    /// No binding in any active scope
    NoMatch,
    Suppressed { scope: String },
    AllowDefault { scope: String },
}

pub type ShortcutHandler = Arc<dyn Fn(&InputEvent) -> HandlerSignal + Send + Sync>;

/// Installs the host's process-wide key listener.
///
/// Started once, on the first registration.
pub trait KeyListenerHost: Send {
    fn start(&mut self);
}

enum Listener {
    Idle(Option<Box<dyn KeyListenerHost>>),
    Listening,
}

struct RegistryState {
    bindings: HashMap<String, ShortcutHandler>,
    /// Insertion order; "global" is always first
    active_scopes: Vec<String>,
    enabled: bool,
    listener: Listener,
}

/// Central registry of scoped keyboard shortcuts.
///
/// Shared by every UI component that registers shortcuts; wrap it in an `Arc`.
/// Only the session controller can switch it off.
pub struct ShortcutRegistry {
    state: Mutex<RegistryState>,
}

impl Default for ShortcutRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn binding_key(scope: &str, chord: &Chord) -> String {
    format!("{}:{}", scope, chord.to_canonical_string())
}

impl ShortcutRegistry {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState {
                bindings: HashMap::new(),
                active_scopes: vec![GLOBAL_SCOPE.to_string()],
                enabled: true,
                listener: Listener::Idle(None),
            }),
        }
    }

    pub fn with_listener_host(host: Box<dyn KeyListenerHost>) -> Self {
        let registry = Self::new();
        registry.state.lock().listener = Listener::Idle(Some(host));
        registry
    }

    /// Bind `chord` in `scope` (default `"global"`), replacing any binding
    /// that normalizes to the same chord in that scope.
    pub fn register<F>(
        &self,
        chord: &str,
        handler: F,
        scope: Option<&str>,
    ) -> Result<(), ShortcutParseError>
    where
        F: Fn(&InputEvent) -> HandlerSignal + Send + Sync + 'static,
    {
        let parsed = Chord::parse(chord)?;
        let scope = scope.unwrap_or(GLOBAL_SCOPE);
        let key = binding_key(scope, &parsed);

        let first_registration = {
            let mut state = self.state.lock();
            if state.bindings.insert(key.clone(), Arc::new(handler)).is_some() {
                debug!(binding = %key, "Replaced existing shortcut binding");
            }
            match std::mem::replace(&mut state.listener, Listener::Listening) {
                Listener::Idle(host) => Some(host),
                Listener::Listening => None,
            }
        };

        if let Some(pending_host) = first_registration {
            info!(event_type = "shortcuts", action = "listener_started", "Key listener started");
            if let Some(mut host) = pending_host {
                host.start();
            }
        }
        Ok(())
    }

    /// Remove a binding. Absent bindings and unparseable chords are a no-op.
    pub fn unregister(&self, chord: &str, scope: Option<&str>) {
        let Ok(parsed) = Chord::parse(chord) else {
            return;
        };
        let key = binding_key(scope.unwrap_or(GLOBAL_SCOPE), &parsed);
        self.state.lock().bindings.remove(&key);
    }

    /// Activate `name`. Already-active scopes keep their position.
    pub fn enable_scope(&self, name: &str) {
        let mut state = self.state.lock();
        if !state.active_scopes.iter().any(|s| s == name) {
            state.active_scopes.push(name.to_string());
            debug!(scope = name, "Shortcut scope enabled");
        }
    }

    pub fn disable_scope(&self, name: &str) {
        if name == GLOBAL_SCOPE {
            warn!("Ignoring request to disable the global shortcut scope");
            return;
        }
        let mut state = self.state.lock();
        state.active_scopes.retain(|s| s != name);
        debug!(scope = name, "Shortcut scope disabled");
    }

    /// Deactivate every scope except `"global"`.
    pub fn clear_scopes(&self) {
        let mut state = self.state.lock();
        state.active_scopes.retain(|s| s == GLOBAL_SCOPE);
    }

    /// Master switch. Only the session controller flips this.
    pub(crate) fn set_enabled(&self, enabled: bool) {
        let mut state = self.state.lock();
        if state.enabled != enabled {
            state.enabled = enabled;
            info!(event_type = "shortcuts", enabled, "Shortcut dispatch toggled");
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    pub fn is_listening(&self) -> bool {
        matches!(self.state.lock().listener, Listener::Listening)
    }

    pub fn active_scopes(&self) -> Vec<String> {
        self.state.lock().active_scopes.clone()
    }

    pub fn is_registered(&self, chord: &str, scope: Option<&str>) -> bool {
        Chord::parse(chord)
            .map(|c| {
                let key = binding_key(scope.unwrap_or(GLOBAL_SCOPE), &c);
                self.state.lock().bindings.contains_key(&key)
            })
            .unwrap_or(false)
    }

    pub fn binding_count(&self) -> usize {
        self.state.lock().bindings.len()
    }

    /// Route a key event to at most one handler.
    ///
    /// The handler runs without the registry lock held, so it may register,
    /// unregister, or change scopes.
    pub fn dispatch(&self, event: &mut InputEvent) -> DispatchOutcome {
        if event.kind != InputKind::KeyDown {
            return DispatchOutcome::NoMatch;
        }

        let found = {
            let state = self.state.lock();
            if !state.enabled {
                return DispatchOutcome::Disabled;
            }
            let chord = Chord::from_event(event);
            state.active_scopes.iter().rev().find_map(|scope| {
                state
                    .bindings
                    .get(&binding_key(scope, &chord))
                    .map(|handler| (scope.clone(), Arc::clone(handler)))
            })
        };

        let Some((scope, handler)) = found else {
            return DispatchOutcome::NoMatch;
        };

        match handler(event) {
            HandlerSignal::AllowDefault => DispatchOutcome::AllowDefault { scope },
            HandlerSignal::Handled => {
                event.suppress();
                DispatchOutcome::Suppressed { scope }
            }
        }
    }
}
