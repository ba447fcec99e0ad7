//! Full-surface input interception.
//!
//! While active, every key-down, pointer-down, and context-menu event is
//! suppressed in the capture phase unless its target sits inside an
//! allow-listed element. Allowed targets still lose events that carry a
//! control/alt/meta chord, so a modified click or key on an allowed control
//! cannot reach a background shortcut.
//!
//! The airlock knows nothing about shortcuts or credentials.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::selector::AllowList;
use crate::input::{InputEvent, InputKind};

/// Host hooks for the capture listeners and the blocking layer.
pub trait InterceptSurface: Send + Sync {
    fn install_capture_listeners(&self);
    fn remove_capture_listeners(&self);
    fn show_overlay(&self);
    fn hide_overlay(&self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterceptVerdict {
    /// Airlock not active; event untouched
    Inactive,
    /// Event kind is not intercepted, or its target is allow-listed
    Passed,
    /// Default prevented and propagation stopped
    Blocked,
}

struct Activation {
    generation: u64,
    allow_list: AllowList,
}

#[derive(Default)]
struct AirlockState {
    active: Option<Activation>,
    next_generation: u64,
}

struct AirlockShared {
    state: Mutex<AirlockState>,
    surface: Arc<dyn InterceptSurface>,
}

impl AirlockShared {
    /// Tear down the activation identified by `generation`. Stale generations
    /// are ignored so an old handle cannot remove a newer activation.
    fn release(&self, generation: u64) -> bool {
        {
            let mut state = self.state.lock();
            match &state.active {
                Some(activation) if activation.generation == generation => state.active = None,
                _ => return false,
            }
        }
        self.surface.hide_overlay();
        self.surface.remove_capture_listeners();
        info!(event_type = "airlock", action = "deactivated", generation, "Airlock deactivated");
        true
    }
}

/// Input interceptor ("airlock").
#[derive(Clone)]
pub struct Airlock {
    shared: Arc<AirlockShared>,
}

impl Airlock {
    pub fn new(surface: Arc<dyn InterceptSurface>) -> Self {
        Self {
            shared: Arc::new(AirlockShared {
                state: Mutex::new(AirlockState::default()),
                surface,
            }),
        }
    }

    /// Install the capture listeners and show the blocking layer.
    ///
    /// Activating while already active replaces the allow-list and
    /// invalidates the previous handle.
    pub fn activate(&self, allow_list: AllowList) -> AirlockHandle {
        let (generation, already_active) = {
            let mut state = self.shared.state.lock();
            let generation = state.next_generation;
            state.next_generation += 1;
            let already_active = state.active.is_some();
            state.active = Some(Activation {
                generation,
                allow_list,
            });
            (generation, already_active)
        };

        if already_active {
            warn!(generation, "Airlock re-activated while active, previous handle invalidated");
        } else {
            self.shared.surface.install_capture_listeners();
            self.shared.surface.show_overlay();
            info!(event_type = "airlock", action = "activated", generation, "Airlock activated");
        }

        AirlockHandle {
            shared: Arc::downgrade(&self.shared),
            generation,
            released: false,
        }
    }

    /// Remove the listeners and unblock the surface. Idempotent.
    pub fn deactivate(&self, handle: AirlockHandle) {
        handle.release();
    }

    pub fn is_active(&self) -> bool {
        self.shared.state.lock().active.is_some()
    }

    /// Capture-phase filter; call before any other handler sees the event.
    pub fn intercept(&self, event: &mut InputEvent) -> InterceptVerdict {
        let state = self.shared.state.lock();
        let Some(activation) = &state.active else {
            return InterceptVerdict::Inactive;
        };

        if !matches!(
            event.kind,
            InputKind::KeyDown | InputKind::PointerDown | InputKind::ContextMenu
        ) {
            return InterceptVerdict::Passed;
        }

        if activation.allow_list.allows(event) && !event.modifiers.is_chord() {
            return InterceptVerdict::Passed;
        }

        event.suppress();
        debug!(kind = ?event.kind, "Airlock blocked event");
        InterceptVerdict::Blocked
    }
}

/// Scoped activation token. Dropping it deactivates the airlock.
#[must_use = "dropping the handle deactivates the airlock immediately"]
pub struct AirlockHandle {
    shared: Weak<AirlockShared>,
    generation: u64,
    released: bool,
}

impl AirlockHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Deactivate now. Same as dropping the handle.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Some(shared) = self.shared.upgrade() {
            shared.release(self.generation);
        }
    }
}

impl Drop for AirlockHandle {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl std::fmt::Debug for AirlockHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirlockHandle")
            .field("generation", &self.generation)
            .field("released", &self.released)
            .finish()
    }
}
