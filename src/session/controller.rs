//! Session lock controller.
//!
//! States: `Locked`, `Unlocking`, `Unlocked`. An installation without a
//! credential is permanently `Unlocked`.
//!
//! The controller is the only writer of the unlocked flag and of the shortcut
//! registry's master switch, and it keeps the switch in lockstep with the
//! airlock overlay: shortcuts go quiet before the overlay appears and come
//! back before it is removed.
//!
//! UI collaborators (views, dialogs, toasts, identity) are called with the
//! session lock released, so their callbacks may re-enter the controller.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use super::dialog::{ActionRole, DialogControl, DialogPresenter, DialogSpec, DialogValues};
use super::host::{IdentityProvider, InlineError, LockScreen, LockScreenView, Notifier, NotifyLevel};
use super::request::{GateRequest, GateResolver};
use crate::config::GateConfig;
use crate::credentials::CredentialStore;
use crate::error::{GateError, ResultExt, ValidationError};
use crate::interceptor::{Airlock, AirlockHandle, InterceptSurface};
use crate::settings::SettingsStore;
use crate::shortcuts::ShortcutRegistry;

const INCORRECT_PASSWORD: &str = "Incorrect password";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockState {
    Locked,
    Unlocking,
    Unlocked,
}

/// Result of a credential submitted from the lock screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnlockAttempt {
    Unlocked,
    Incorrect,
    /// No unlock prompt is showing
    NotPending,
}

/// Everything the controller needs from the host application.
pub struct Collaborators {
    pub settings: Arc<dyn SettingsStore>,
    pub dialogs: Arc<dyn DialogPresenter>,
    pub identity: Arc<dyn IdentityProvider>,
    pub notifier: Arc<dyn Notifier>,
    pub lock_screen: Arc<dyn LockScreenView>,
    pub surface: Arc<dyn InterceptSurface>,
    pub shortcuts: Arc<ShortcutRegistry>,
}

struct Unlocking {
    /// `None` only while the airlock is being raised
    airlock: Option<AirlockHandle>,
    waiters: Vec<GateResolver>,
    screen: LockScreen,
}

struct Session {
    credentials: CredentialStore,
    unlocked: bool,
    unlocking: Option<Unlocking>,
}

struct Inner {
    session: Mutex<Session>,
    config: GateConfig,
    airlock: Airlock,
    shortcuts: Arc<ShortcutRegistry>,
    dialogs: Arc<dyn DialogPresenter>,
    identity: Arc<dyn IdentityProvider>,
    notifier: Arc<dyn Notifier>,
    lock_screen: Arc<dyn LockScreenView>,
}

/// Access gate for the application. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionLock {
    inner: Arc<Inner>,
}

/// Check a new password before anything is hashed or written.
pub fn validate_new_password(
    password: &str,
    confirmation: Option<&str>,
    min_length: usize,
) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Empty);
    }
    if password.chars().count() < min_length {
        return Err(ValidationError::TooShort { min: min_length });
    }
    if confirmation.is_some_and(|c| c != password) {
        return Err(ValidationError::Mismatch);
    }
    Ok(())
}

impl SessionLock {
    pub fn new(collaborators: Collaborators, config: GateConfig) -> Self {
        let credentials = CredentialStore::load(collaborators.settings);
        info!(
            event_type = "session",
            protected = credentials.has_credential(),
            "Session gate created"
        );
        Self {
            inner: Arc::new(Inner {
                session: Mutex::new(Session {
                    credentials,
                    unlocked: false,
                    unlocking: None,
                }),
                airlock: Airlock::new(collaborators.surface),
                shortcuts: collaborators.shortcuts,
                dialogs: collaborators.dialogs,
                identity: collaborators.identity,
                notifier: collaborators.notifier,
                lock_screen: collaborators.lock_screen,
                config,
            }),
        }
    }

    fn downgrade(&self) -> Weak<Inner> {
        Arc::downgrade(&self.inner)
    }

    fn upgrade(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn config(&self) -> &GateConfig {
        &self.inner.config
    }

    /// The capture-phase filter. The host routes every input event through
    /// [`Airlock::intercept`] before its own handlers.
    pub fn airlock(&self) -> &Airlock {
        &self.inner.airlock
    }

    pub fn has_credential(&self) -> bool {
        self.inner.session.lock().credentials.has_credential()
    }

    /// True when the session is unlocked or no credential is configured.
    pub fn is_unlocked(&self) -> bool {
        let session = self.inner.session.lock();
        !session.credentials.has_credential() || session.unlocked
    }

    pub fn state(&self) -> LockState {
        let session = self.inner.session.lock();
        if !session.credentials.has_credential() || session.unlocked {
            LockState::Unlocked
        } else if session.unlocking.is_some() {
            LockState::Unlocking
        } else {
            LockState::Locked
        }
    }

    /// Idle minutes for the host's auto-lock policy, if configured.
    pub fn auto_lock_timeout(&self) -> Option<u64> {
        self.inner.session.lock().credentials.auto_lock_timeout()
    }

    /// Mark the session locked. Shows no UI; follow with `request_unlock`.
    pub fn lock(&self) {
        let mut session = self.inner.session.lock();
        if !session.credentials.has_credential() {
            debug!("lock() ignored, no credential configured");
            return;
        }
        if session.unlocked {
            session.unlocked = false;
            info!(event_type = "session", state = "locked", "Session locked");
        }
    }

    /// Gate the application until the correct password is entered.
    ///
    /// Resolves `true` immediately when unprotected or already unlocked.
    /// Otherwise raises the airlock and lock screen and resolves `true` once
    /// the user unlocks. Concurrent calls attach to the prompt already
    /// showing. There is no cancel path on the lock screen.
    pub fn request_unlock(&self) -> GateRequest {
        {
            let session = self.inner.session.lock();
            if !session.credentials.has_credential() || session.unlocked {
                return GateRequest::ready(true);
            }
        }
        let (resolver, request) = GateRequest::pending();
        self.begin_unlock(resolver);
        request
    }

    fn begin_unlock(&self, resolver: GateResolver) {
        {
            let mut session = self.inner.session.lock();
            if !session.credentials.has_credential() || session.unlocked {
                drop(session);
                resolver.resolve(true);
                return;
            }
            if let Some(unlocking) = session.unlocking.as_mut() {
                unlocking.waiters.push(resolver);
                debug!(
                    waiters = unlocking.waiters.len(),
                    "Unlock already pending, attaching to it"
                );
                return;
            }
            session.unlocking = Some(Unlocking {
                airlock: None,
                waiters: vec![resolver],
                screen: LockScreen {
                    title: self.inner.config.lock_title.clone(),
                    username: String::new(),
                    error: None,
                },
            });
        }
        info!(event_type = "session", state = "unlocking", "Unlock requested");

        let username = self.display_name();
        let handle = self.raise_airlock();
        let screen = {
            let mut session = self.inner.session.lock();
            match session.unlocking.as_mut() {
                Some(unlocking) => {
                    unlocking.screen.username = username;
                    unlocking.airlock = Some(handle);
                    Ok(unlocking.screen.clone())
                }
                None => Err(handle),
            }
        };

        match screen {
            Ok(screen) => self.inner.lock_screen.render(&screen),
            // Resolved while the airlock was going up
            Err(handle) => self.lower_airlock(Some(handle)),
        }
    }

    fn display_name(&self) -> String {
        self.inner
            .identity
            .username()
            .warn_on_err()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.inner.config.fallback_username.clone())
    }

    fn raise_airlock(&self) -> AirlockHandle {
        self.inner.shortcuts.set_enabled(false);
        self.inner.airlock.activate(self.inner.config.allow_list())
    }

    fn lower_airlock(&self, handle: Option<AirlockHandle>) {
        self.inner.shortcuts.set_enabled(true);
        if let Some(handle) = handle {
            handle.release();
        }
    }

    /// Submit a password from the lock screen input.
    pub fn submit_unlock(&self, password: &str) -> UnlockAttempt {
        let mut session = self.inner.session.lock();
        if session.unlocking.is_none() {
            return UnlockAttempt::NotPending;
        }

        if !session.credentials.verify(password) {
            let error = InlineError {
                message: INCORRECT_PASSWORD.to_string(),
                display_for: self.inner.config.inline_error_duration(),
            };
            let screen = session.unlocking.as_mut().map(|unlocking| {
                unlocking.screen.error = Some(error);
                unlocking.screen.clone()
            });
            drop(session);
            warn!(event_type = "session", "Incorrect unlock attempt");
            if let Some(screen) = screen {
                self.inner.lock_screen.render(&screen);
            }
            return UnlockAttempt::Incorrect;
        }

        session.unlocked = true;
        let unlocking = session.unlocking.take();
        drop(session);

        info!(event_type = "session", state = "unlocked", "Session unlocked");
        self.finish_unlocking(unlocking, true);
        UnlockAttempt::Unlocked
    }

    /// Abandon a pending unlock prompt (Unlocking -> Locked). Pending
    /// requests resolve `false`. Returns false when no prompt was showing.
    pub fn cancel_unlock(&self) -> bool {
        let unlocking = self.inner.session.lock().unlocking.take();
        if unlocking.is_none() {
            return false;
        }
        info!(event_type = "session", state = "locked", "Unlock prompt cancelled");
        self.finish_unlocking(unlocking, false);
        true
    }

    fn finish_unlocking(&self, unlocking: Option<Unlocking>, outcome: bool) {
        let Some(unlocking) = unlocking else {
            return;
        };
        self.lower_airlock(unlocking.airlock);
        for waiter in unlocking.waiters {
            waiter.resolve(outcome);
        }
    }

    /// Re-authenticate for one sensitive action through a transient dialog.
    ///
    /// Resolves `true` immediately when unprotected. Does not change the
    /// unlocked flag.
    pub fn verify_action(&self) -> GateRequest {
        if !self.has_credential() {
            return GateRequest::ready(true);
        }
        let (resolver, request) = GateRequest::pending();
        let title = self.inner.config.verify_title.clone();
        self.present_password_check(
            title,
            "Enter your password to continue.",
            "Confirm",
            resolver,
            |_| Ok(()),
        );
        request
    }

    /// Password dialog whose primary action runs `on_verified` after the
    /// password checks out. The request resolves `true` when `on_verified`
    /// succeeds, `false` on cancel.
    fn present_password_check<F>(
        &self,
        title: String,
        message: &str,
        confirm_label: &str,
        resolver: GateResolver,
        on_verified: F,
    ) where
        F: Fn(&SessionLock) -> Result<(), GateError> + Send + Sync + 'static,
    {
        let weak = self.downgrade();
        let cancel = resolver.clone();
        let dialog = DialogSpec::new(title, message)
            .password_field("password", "Password")
            .action(
                "confirm",
                confirm_label,
                ActionRole::Primary,
                move |values: &DialogValues, control: &dyn DialogControl| {
                    let Some(gate) = SessionLock::upgrade(&weak) else {
                        control.close();
                        resolver.resolve(false);
                        return;
                    };
                    if !gate.verify_password(values.get("password")) {
                        warn!(event_type = "session", "Incorrect password in verification dialog");
                        control.show_error(INCORRECT_PASSWORD);
                        return;
                    }
                    match on_verified(&gate) {
                        Ok(()) => {
                            control.close();
                            resolver.resolve(true);
                        }
                        Err(e) => control.show_error(&e.user_message()),
                    }
                },
            )
            .action(
                "cancel",
                "Cancel",
                ActionRole::Cancel,
                move |_: &DialogValues, control: &dyn DialogControl| {
                    control.close();
                    cancel.resolve(false);
                },
            );
        self.inner.dialogs.present(dialog);
    }

    fn verify_password(&self, password: &str) -> bool {
        self.inner.session.lock().credentials.verify(password)
    }

    /// Store a new password and trust the current session.
    ///
    /// On failure neither the credential nor the unlocked flag changes.
    pub fn set_password(&self, password: &str) -> Result<(), GateError> {
        validate_new_password(password, None, self.inner.config.min_password_length)?;
        self.store_password(password, "Password set")
    }

    fn store_password(&self, password: &str, success_message: &str) -> Result<(), GateError> {
        let mut session = self.inner.session.lock();
        let stored = session.credentials.set(password);
        if let Err(e) = stored {
            drop(session);
            return Err(self.report_persistence_failure(e.into()));
        }
        session.unlocked = true;
        let unlocking = session.unlocking.take();
        drop(session);

        self.finish_unlocking(unlocking, true);
        self.inner.notifier.show(success_message, NotifyLevel::Success);
        Ok(())
    }

    /// Clear the password. The installation becomes permanently unlocked.
    pub fn remove_password(&self) -> Result<(), GateError> {
        let mut session = self.inner.session.lock();
        let removed = session.credentials.remove();
        if let Err(e) = removed {
            drop(session);
            return Err(self.report_persistence_failure(e.into()));
        }
        session.unlocked = true;
        let unlocking = session.unlocking.take();
        drop(session);

        info!(event_type = "session", "Password protection removed");
        self.finish_unlocking(unlocking, true);
        self.inner.notifier.show("Password removed", NotifyLevel::Success);
        Ok(())
    }

    /// Replace the password after checking the current one.
    pub fn change_password(
        &self,
        current: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<(), GateError> {
        if self.has_credential() && !self.verify_password(current) {
            return Err(ValidationError::IncorrectCurrentPassword.into());
        }
        validate_new_password(
            new_password,
            Some(confirmation),
            self.inner.config.min_password_length,
        )?;
        self.store_password(new_password, "Password changed")
    }

    fn report_persistence_failure(&self, err: GateError) -> GateError {
        error!(event_type = "session", error = %err, "Credential update failed");
        self.inner
            .notifier
            .show(&err.user_message(), err.severity().into());
        err
    }

    /// Dialog flow for creating a password (password + confirmation).
    pub fn prompt_set_password(&self) -> GateRequest {
        let (resolver, request) = GateRequest::pending();
        self.present_set_password(resolver, |_, resolver| resolver.resolve(true));
        request
    }

    /// Creation dialog. `on_saved` runs after the password is stored and
    /// decides when the request resolves.
    fn present_set_password<F>(&self, resolver: GateResolver, on_saved: F)
    where
        F: Fn(&SessionLock, GateResolver) + Send + Sync + 'static,
    {
        let weak = self.downgrade();
        let cancel = resolver.clone();
        let dialog = DialogSpec::new(
            "Set Password",
            "Choose a password to protect your vault.",
        )
        .password_field("password", "Password")
        .password_field("confirm", "Confirm password")
        .action(
            "save",
            "Save",
            ActionRole::Primary,
            move |values: &DialogValues, control: &dyn DialogControl| {
                let Some(gate) = SessionLock::upgrade(&weak) else {
                    control.close();
                    resolver.resolve(false);
                    return;
                };
                let password = values.get("password");
                if let Err(e) = validate_new_password(
                    password,
                    Some(values.get("confirm")),
                    gate.inner.config.min_password_length,
                ) {
                    control.show_error(&GateError::from(e).user_message());
                    return;
                }
                match gate.store_password(password, "Password set") {
                    Ok(()) => {
                        control.close();
                        on_saved(&gate, resolver.clone());
                    }
                    Err(e) => control.show_error(&e.user_message()),
                }
            },
        )
        .action(
            "cancel",
            "Cancel",
            ActionRole::Cancel,
            move |_: &DialogValues, control: &dyn DialogControl| {
                control.close();
                cancel.resolve(false);
            },
        );
        self.inner.dialogs.present(dialog);
    }

    /// Dialog flow for changing the password. Falls back to the creation
    /// dialog when no password is set.
    pub fn prompt_change_password(&self) -> GateRequest {
        if !self.has_credential() {
            return self.prompt_set_password();
        }
        let (resolver, request) = GateRequest::pending();
        let weak = self.downgrade();
        let cancel = resolver.clone();
        let dialog = DialogSpec::new("Change Password", "Enter your current and new password.")
            .password_field("current", "Current password")
            .password_field("password", "New password")
            .password_field("confirm", "Confirm new password")
            .action(
                "save",
                "Change",
                ActionRole::Primary,
                move |values: &DialogValues, control: &dyn DialogControl| {
                    let Some(gate) = SessionLock::upgrade(&weak) else {
                        control.close();
                        resolver.resolve(false);
                        return;
                    };
                    match gate.change_password(
                        values.get("current"),
                        values.get("password"),
                        values.get("confirm"),
                    ) {
                        Ok(()) => {
                            control.close();
                            resolver.resolve(true);
                        }
                        Err(e) => control.show_error(&e.user_message()),
                    }
                },
            )
            .action(
                "cancel",
                "Cancel",
                ActionRole::Cancel,
                move |_: &DialogValues, control: &dyn DialogControl| {
                    control.close();
                    cancel.resolve(false);
                },
            );
        self.inner.dialogs.present(dialog);
        request
    }

    /// Disable protection after re-verifying the password.
    pub fn prompt_remove_password(&self) -> GateRequest {
        if !self.has_credential() {
            return GateRequest::ready(true);
        }
        let (resolver, request) = GateRequest::pending();
        self.present_password_check(
            "Remove Password".to_string(),
            "Enter your password to turn off protection.",
            "Remove",
            resolver,
            |gate| gate.remove_password(),
        );
        request
    }

    /// Lock now and show the unlock prompt. Without a credential, first asks
    /// the user to create one; cancelling that resolves `false` and leaves
    /// the session unlocked. Otherwise resolves `true` once unlocked again.
    pub fn prompt_and_lock(&self) -> GateRequest {
        let (resolver, request) = GateRequest::pending();
        if self.has_credential() {
            self.lock();
            self.begin_unlock(resolver);
        } else {
            self.present_set_password(resolver, |gate, resolver| {
                gate.lock();
                gate.begin_unlock(resolver);
            });
        }
        request
    }
}
