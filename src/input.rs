//! Host-neutral input events.
//!
//! The host translates its native keyboard/pointer events into [`InputEvent`]
//! and routes each one through the airlock (capture phase) before the
//! shortcut registry sees it. Both consumers mark the event rather than
//! returning a new one, so the host can honor `default_prevented` and
//! `propagation_stopped` exactly as its own event system would.

use std::collections::HashMap;

use smallvec::SmallVec;

/// Modifier keys held while an event fired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn control() -> Self {
        Self {
            control: true,
            ..Default::default()
        }
    }
    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Default::default()
        }
    }
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Default::default()
        }
    }
    /// Control, alt, or meta held. Shift alone only changes the produced
    /// character and is not a chord.
    pub fn is_chord(&self) -> bool {
        self.control || self.alt || self.meta
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    KeyDown,
    KeyUp,
    PointerDown,
    ContextMenu,
}

/// One element on an event's propagation path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementInfo {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: HashMap<String, String>,
}

impl ElementInfo {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_lowercase(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into().to_lowercase(), value.into());
        self
    }
}

/// Propagation path: target first, then its ancestors.
pub type EventPath = SmallVec<[ElementInfo; 4]>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub kind: InputKind,
    /// Key name as reported by the host (`"k"`, `"Enter"`, `"ArrowUp"`).
    /// Empty for pointer and context-menu events.
    pub key: String,
    pub modifiers: Modifiers,
    pub path: EventPath,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl InputEvent {
    pub fn key_down(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self::new(InputKind::KeyDown, key.into(), modifiers)
    }

    pub fn pointer_down(modifiers: Modifiers) -> Self {
        Self::new(InputKind::PointerDown, String::new(), modifiers)
    }

    pub fn context_menu() -> Self {
        Self::new(InputKind::ContextMenu, String::new(), Modifiers::default())
    }

    pub fn new(kind: InputKind, key: String, modifiers: Modifiers) -> Self {
        Self {
            kind,
            key,
            modifiers,
            path: EventPath::new(),
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Append the next element of the propagation path (target first).
    pub fn on(mut self, element: ElementInfo) -> Self {
        self.path.push(element);
        self
    }

    pub fn target(&self) -> Option<&ElementInfo> {
        self.path.first()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Prevent the default action and stop propagation.
    pub fn suppress(&mut self) {
        self.prevent_default();
        self.stop_propagation();
    }
}
