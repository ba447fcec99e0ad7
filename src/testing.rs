//! In-memory fakes for the host collaborators.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::GateConfig;
use crate::interceptor::InterceptSurface;
use crate::session::{
    Collaborators, DialogControl, DialogPresenter, DialogSpec, DialogValues, IdentityProvider,
    LockScreen, LockScreenView, Notifier, NotifyLevel, SessionLock,
};
use crate::settings::{Settings, SettingsError, SettingsPatch, SettingsStore};
use crate::shortcuts::ShortcutRegistry;

/// Settings store whose reads or writes can be made to fail.
#[derive(Default)]
pub struct FailingSettingsStore {
    settings: Mutex<Settings>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FailingSettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
            ..Default::default()
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Settings {
        self.settings.lock().clone()
    }
}

impl SettingsStore for FailingSettingsStore {
    fn get(&self) -> Result<Settings, SettingsError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(SettingsError::Unavailable("permission denied".to_string()));
        }
        Ok(self.settings.lock().clone())
    }

    fn update(&self, patch: SettingsPatch) -> Result<Settings, SettingsError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SettingsError::Unavailable("disk full".to_string()));
        }
        let mut settings = self.settings.lock();
        patch.apply_to(&mut settings);
        Ok(settings.clone())
    }
}

#[derive(Default)]
struct SurfaceState {
    calls: Vec<&'static str>,
    overlay_visible: bool,
    listeners_installed: bool,
    /// Registry switch sampled at every overlay transition
    switch_samples: Vec<(&'static str, bool)>,
}

/// Intercept surface that records every call.
#[derive(Default)]
pub struct RecordingSurface {
    state: Mutex<SurfaceState>,
    registry: Mutex<Option<Arc<ShortcutRegistry>>>,
}

impl RecordingSurface {
    /// Sample `registry.is_enabled()` on each show/hide.
    pub fn watch_registry(&self, registry: Arc<ShortcutRegistry>) {
        *self.registry.lock() = Some(registry);
    }

    fn record(&self, call: &'static str) {
        let enabled = self.registry.lock().as_ref().map(|r| r.is_enabled());
        let mut state = self.state.lock();
        state.calls.push(call);
        match call {
            "install_listeners" => state.listeners_installed = true,
            "remove_listeners" => state.listeners_installed = false,
            "show_overlay" => state.overlay_visible = true,
            "hide_overlay" => state.overlay_visible = false,
            _ => {}
        }
        if let (Some(enabled), "show_overlay" | "hide_overlay") = (enabled, call) {
            state.switch_samples.push((call, enabled));
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().calls.clone()
    }

    pub fn overlay_visible(&self) -> bool {
        self.state.lock().overlay_visible
    }

    pub fn listeners_installed(&self) -> bool {
        self.state.lock().listeners_installed
    }

    pub fn show_count(&self) -> usize {
        self.count("show_overlay")
    }

    pub fn hide_count(&self) -> usize {
        self.count("hide_overlay")
    }

    fn count(&self, call: &str) -> usize {
        self.state.lock().calls.iter().filter(|c| **c == call).count()
    }

    pub fn switch_samples(&self) -> Vec<(&'static str, bool)> {
        self.state.lock().switch_samples.clone()
    }
}

impl InterceptSurface for RecordingSurface {
    fn install_capture_listeners(&self) {
        self.record("install_listeners");
    }

    fn remove_capture_listeners(&self) {
        self.record("remove_listeners");
    }

    fn show_overlay(&self) {
        self.record("show_overlay");
    }

    fn hide_overlay(&self) {
        self.record("hide_overlay");
    }
}

/// Dialog handle that remembers what the controller asked of it.
#[derive(Default)]
pub struct RecordingControl {
    closed: AtomicBool,
    errors: Mutex<Vec<String>>,
}

impl RecordingControl {
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn last_error(&self) -> Option<String> {
        self.errors.lock().last().cloned()
    }
}

impl DialogControl for RecordingControl {
    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn show_error(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }
}

/// Presenter that keeps every dialog so tests can press its buttons.
#[derive(Default)]
pub struct RecordingPresenter {
    presented: Mutex<Vec<DialogSpec>>,
}

impl RecordingPresenter {
    pub fn count(&self) -> usize {
        self.presented.lock().len()
    }

    pub fn last(&self) -> Option<DialogSpec> {
        self.presented.lock().last().cloned()
    }

    /// Press `action_id` on the most recent dialog with the given field values.
    pub fn press(&self, action_id: &str, values: &[(&str, &str)]) -> RecordingControl {
        let action = self
            .last()
            .and_then(|dialog| dialog.find_action(action_id).cloned())
            .unwrap_or_else(|| panic!("no dialog action '{action_id}'"));
        let values: DialogValues = values.iter().copied().collect();
        let control = RecordingControl::default();
        (action.on_press)(&values, &control);
        control
    }

    /// Dismiss the most recent dialog without pressing a button.
    pub fn dismiss(&self) -> RecordingControl {
        let action = self
            .last()
            .and_then(|dialog| dialog.cancel_action().cloned())
            .expect("dialog has a cancel action");
        let control = RecordingControl::default();
        (action.on_press)(&DialogValues::default(), &control);
        control
    }
}

impl DialogPresenter for RecordingPresenter {
    fn present(&self, dialog: DialogSpec) {
        self.presented.lock().push(dialog);
    }
}

/// Identity lookup with a fixed answer; `None` fails.
pub struct FixedIdentity(pub Option<String>);

impl IdentityProvider for FixedIdentity {
    fn username(&self) -> anyhow::Result<String> {
        self.0
            .clone()
            .ok_or_else(|| anyhow::anyhow!("identity service unavailable"))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<(String, NotifyLevel)>>,
}

impl RecordingNotifier {
    pub fn shown(&self) -> Vec<(String, NotifyLevel)> {
        self.shown.lock().clone()
    }

    pub fn last(&self) -> Option<(String, NotifyLevel)> {
        self.shown.lock().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, message: &str, level: NotifyLevel) {
        self.shown.lock().push((message.to_string(), level));
    }
}

#[derive(Default)]
pub struct RecordingLockScreen {
    renders: Mutex<Vec<LockScreen>>,
}

impl RecordingLockScreen {
    pub fn renders(&self) -> Vec<LockScreen> {
        self.renders.lock().clone()
    }

    pub fn last(&self) -> Option<LockScreen> {
        self.renders.lock().last().cloned()
    }
}

impl LockScreenView for RecordingLockScreen {
    fn render(&self, screen: &LockScreen) {
        self.renders.lock().push(screen.clone());
    }
}

/// A gate wired to recording fakes.
pub struct Harness {
    pub gate: SessionLock,
    pub settings: Arc<FailingSettingsStore>,
    pub dialogs: Arc<RecordingPresenter>,
    pub notifier: Arc<RecordingNotifier>,
    pub lock_screen: Arc<RecordingLockScreen>,
    pub surface: Arc<RecordingSurface>,
    pub shortcuts: Arc<ShortcutRegistry>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(Settings::default(), Some("ada"))
    }

    /// Harness whose settings already hold the hash of `password`.
    pub fn protected(password: &str) -> Self {
        Self::with(
            Settings {
                password_hash: Some(crate::credentials::hash_password(password)),
                ..Default::default()
            },
            Some("ada"),
        )
    }

    pub fn with(settings: Settings, username: Option<&str>) -> Self {
        Self::with_store(Arc::new(FailingSettingsStore::new(settings)), username)
    }

    pub fn with_store(settings: Arc<FailingSettingsStore>, username: Option<&str>) -> Self {
        let dialogs = Arc::new(RecordingPresenter::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let lock_screen = Arc::new(RecordingLockScreen::default());
        let surface = Arc::new(RecordingSurface::default());
        let shortcuts = Arc::new(ShortcutRegistry::new());
        surface.watch_registry(Arc::clone(&shortcuts));

        let gate = SessionLock::new(
            Collaborators {
                settings: settings.clone(),
                dialogs: dialogs.clone(),
                identity: Arc::new(FixedIdentity(username.map(str::to_string))),
                notifier: notifier.clone(),
                lock_screen: lock_screen.clone(),
                surface: surface.clone(),
                shortcuts: Arc::clone(&shortcuts),
            },
            GateConfig::default(),
        );

        Self {
            gate,
            settings,
            dialogs,
            notifier,
            lock_screen,
            surface,
            shortcuts,
        }
    }
}
