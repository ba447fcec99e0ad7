//! Host collaborators the session controller talks to.

use std::time::Duration;

use crate::error::ErrorSeverity;

/// Supplies the name shown on the lock screen.
pub trait IdentityProvider: Send + Sync {
    fn username(&self) -> anyhow::Result<String>;
}

/// Toast severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifyLevel {
    Success,
    Warning,
    Error,
}

impl From<ErrorSeverity> for NotifyLevel {
    fn from(severity: ErrorSeverity) -> Self {
        match severity {
            ErrorSeverity::Warning => NotifyLevel::Warning,
            ErrorSeverity::Error => NotifyLevel::Error,
        }
    }
}

/// Fire-and-forget toast sink.
pub trait Notifier: Send + Sync {
    fn show(&self, message: &str, level: NotifyLevel);
}

/// Transient message under the credential input. The view clears it once
/// `display_for` has elapsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineError {
    pub message: String,
    pub display_for: Duration,
}

/// Content of the credential prompt drawn on the airlock overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockScreen {
    pub title: String,
    pub username: String,
    pub error: Option<InlineError>,
}

/// Draws the lock screen inside the airlock overlay. Its password input
/// submits through `SessionLock::submit_unlock`.
pub trait LockScreenView: Send + Sync {
    fn render(&self, screen: &LockScreen);
}
