//! Session lock controller and its host contracts.
//!
//! # Module Structure
//!
//! - `controller` - Lock state machine, credential flows
//! - `request` - Pending gate outcomes
//! - `dialog` - Modal dialog description handed to the host
//! - `host` - Identity, toast, and lock screen collaborators

mod controller;
mod dialog;
mod host;
mod request;

pub use controller::{validate_new_password, Collaborators, LockState, SessionLock, UnlockAttempt};
pub use dialog::{
    ActionCallback, ActionRole, DialogAction, DialogControl, DialogField, DialogPresenter,
    DialogSpec, DialogValues, FieldKind,
};
pub use host::{IdentityProvider, InlineError, LockScreen, LockScreenView, Notifier, NotifyLevel};
pub use request::GateRequest;
