//! Session lifecycle and the query/command surface.

use crate::SessionError;
use crate::config::SessionConfig;
use crate::input::{InputPoller, InputType};
use crate::sdk::{SdkError, SteamId, SteamSdk};
use crate::state::SessionState;

/// Owns a Steam session for its lifetime.
///
/// The host drives the lifecycle explicitly: [`start`](Self::start) once,
/// [`enable`](Self::enable) after it, [`poll`](Self::poll) every frame,
/// and [`stop`](Self::stop) at teardown (also run on drop). Queries are safe
/// in any state and return empty or negative answers unless the session is
/// initialized.
///
/// The SDK backend is taken by value, so a backend instance belongs to at
/// most one manager.
pub struct SessionManager<S: SteamSdk> {
    sdk: S,
    config: SessionConfig,
    state: SessionState,
    poller: InputPoller,
    warning_hook_installed: bool,
}

impl<S: SteamSdk> SessionManager<S> {
    pub fn new(sdk: S, config: SessionConfig) -> Self {
        let poller = InputPoller::new(config.input_slots);
        Self {
            sdk,
            config,
            state: SessionState::Uninitialized,
            poller,
            warning_hook_installed: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Read-only view of the backend. Every mutation goes through the
    /// session so the lifecycle cannot be bypassed.
    pub fn sdk(&self) -> &S {
        &self.sdk
    }

    /// Brings the session up.
    ///
    /// Runs the layout check, the relaunch check, then API init, stopping at
    /// the first failure. A failure moves the session to
    /// [`SessionState::Failed`] and is returned once; later calls never
    /// touch the SDK again and report the current state. Check
    /// [`SessionError::is_fatal`] to decide whether the process must exit.
    pub fn start(&mut self) -> Result<SessionState, SessionError> {
        match self.state {
            SessionState::Uninitialized => {}
            SessionState::Initialized => {
                tracing::debug!("steam session already initialized, skipping");
                return Ok(self.state);
            }
            SessionState::Failed | SessionState::ShutDown => {
                tracing::debug!(state = %self.state, "steam session start already attempted");
                return Ok(self.state);
            }
        }

        if !self.config.enabled {
            tracing::info!("steam session disabled by configuration");
            return Ok(self.state);
        }

        if !self.sdk.layout_compatible() {
            return Err(self.fail(SessionError::LayoutCheckFailed));
        }

        match self.sdk.restart_app_if_necessary(self.config.app_id) {
            Ok(false) => {}
            Ok(true) => return Err(self.fail(SessionError::RestartRequired)),
            Err(SdkError::LibraryMissing(library)) => {
                return Err(self.fail(SessionError::BinaryMissing(library)));
            }
            Err(SdkError::InitFailed(reason)) => {
                return Err(self.fail(SessionError::InitFailed(reason)));
            }
        }

        if let Err(e) = self.sdk.init() {
            let reason = match e {
                SdkError::InitFailed(reason) | SdkError::LibraryMissing(reason) => reason,
            };
            return Err(self.fail(SessionError::InitFailed(reason)));
        }

        self.state = SessionState::Initialized;
        tracing::info!(app_id = %self.config.app_id, "steam session initialized");
        Ok(self.state)
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        self.state = SessionState::Failed;
        if err.is_fatal() {
            tracing::error!(fatal = true, "steam session start failed: {err}");
        } else {
            tracing::error!("steam session start failed: {err}");
        }
        err
    }

    /// Installs the SDK warning hook once the session is initialized.
    pub fn enable(&mut self) {
        if !self.is_initialized()
            || !self.config.forward_sdk_warnings
            || self.warning_hook_installed
        {
            return;
        }

        let installed = self.sdk.install_warning_hook(Box::new(|severity, text| {
            tracing::warn!(target: "steamgate::sdk", severity, "{text}");
        }));
        if installed {
            self.warning_hook_installed = true;
            tracing::debug!("steam warning hook installed");
        } else {
            tracing::debug!("steam backend declined the warning hook");
        }
    }

    /// Pumps pending SDK callbacks. Call once per frame.
    pub fn poll(&mut self) {
        if !self.is_initialized() {
            return;
        }
        self.sdk.run_callbacks();
    }

    /// Releases the SDK session. Only the first call after a successful
    /// start does anything.
    pub fn stop(&mut self) {
        if !self.is_initialized() {
            return;
        }
        self.sdk.shutdown();
        self.state = SessionState::ShutDown;
        self.warning_hook_installed = false;
        tracing::info!("steam session shut down");
    }

    /// Returns a `Failed` or `ShutDown` session to `Uninitialized` so that
    /// [`start`](Self::start) may run again. Refused while initialized.
    pub fn reset(&mut self) -> bool {
        if self.is_initialized() {
            tracing::warn!("refusing to reset a live steam session");
            return false;
        }
        self.state = SessionState::Uninitialized;
        self.warning_hook_installed = false;
        true
    }

    /// Device types of the connected controllers, without `Unknown` entries.
    pub fn connected_input_types(&mut self) -> Vec<InputType> {
        if !self.is_initialized() {
            return Vec::new();
        }
        self.poller.poll(&mut self.sdk)
    }

    /// Reads an achievement. `None` if the session is not initialized or
    /// the SDK does not know `label`.
    pub fn try_get_achievement(&self, label: &str) -> Option<bool> {
        if !self.is_initialized() {
            return None;
        }
        self.sdk.achievement(label)
    }

    /// Unlocks an achievement and persists it.
    ///
    /// Returns `true` only if every SDK step reported success.
    pub fn set_achievement(&mut self, label: &str) -> bool {
        if !self.is_initialized() {
            return false;
        }
        if !self.sdk.request_current_stats() {
            tracing::warn!(label, "current stats unavailable, achievement not set");
            return false;
        }

        let set = self.sdk.set_achievement(label);
        if !set {
            tracing::warn!(label, "failed to set achievement");
        }
        let stored = self.store();
        set && stored
    }

    /// Writes an integer stat and persists it.
    ///
    /// Returns `true` only if every SDK step reported success.
    pub fn set_stat(&mut self, label: &str, value: i32) -> bool {
        if !self.is_initialized() {
            return false;
        }
        if !self.sdk.request_current_stats() {
            tracing::warn!(label, "current stats unavailable, stat not set");
            return false;
        }

        let set = self.sdk.set_stat_i32(label, value);
        if !set {
            tracing::warn!(label, value, "failed to set stat");
        }
        let stored = self.store();
        set && stored
    }

    fn store(&mut self) -> bool {
        let stored = self.sdk.store_stats();
        if !stored {
            tracing::warn!("failed to store stats");
        }
        stored
    }

    /// Steam ID of the signed-in user.
    pub fn user_id(&self) -> Option<SteamId> {
        if !self.is_initialized() {
            return None;
        }
        Some(self.sdk.user_id())
    }
}

impl<S: SteamSdk> Drop for SessionManager<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
