//! In-memory SDK backend.
//!
//! Behaves like a signed-in Steam client without touching the network:
//! achievements and stats live in maps, controllers are a fixed list, and
//! queued warnings are delivered on the next callback pump. Each startup
//! stage can be made to fail, and every SDK call is recorded, so hosts can
//! run without a Steam client and tests can observe exactly what the
//! session manager asked for.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};

use crate::input::InputType;
use crate::sdk::{AppId, InputHandle, SdkError, SteamId, SteamSdk, WarningHook};

/// Steam ID reported by a default offline backend.
pub const OFFLINE_STEAM_ID: SteamId = SteamId(76561197960265728);

/// A recorded SDK call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkCall {
    LayoutCheck,
    RestartCheck(AppId),
    Init,
    Shutdown,
    RunCallbacks,
    InstallWarningHook,
    /// Carries the length of the handle buffer passed in.
    ConnectedControllers(usize),
    InputType(InputHandle),
    Achievement(String),
    RequestCurrentStats,
    SetAchievement(String),
    SetStat(String, i32),
    StoreStats,
    UserId,
}

impl SdkCall {
    /// Returns `true` for calls that read or write user stats.
    pub fn touches_stats(&self) -> bool {
        matches!(
            self,
            Self::Achievement(_)
                | Self::RequestCurrentStats
                | Self::SetAchievement(_)
                | Self::SetStat(..)
                | Self::StoreStats
        )
    }
}

/// Offline Steam SDK backend.
pub struct OfflineSdk {
    layout_ok: bool,
    restart_required: bool,
    missing_library: Option<String>,
    init_error: Option<String>,
    initialized: bool,
    steam_id: SteamId,
    controllers: Vec<InputType>,
    achievements: BTreeMap<String, bool>,
    stats: BTreeMap<String, i32>,
    stores: usize,
    warning_hook: Option<WarningHook>,
    pending_warnings: VecDeque<(i32, String)>,
    calls: RefCell<Vec<SdkCall>>,
}

impl OfflineSdk {
    pub fn new() -> Self {
        Self {
            layout_ok: true,
            restart_required: false,
            missing_library: None,
            init_error: None,
            initialized: false,
            steam_id: OFFLINE_STEAM_ID,
            controllers: Vec::new(),
            achievements: BTreeMap::new(),
            stats: BTreeMap::new(),
            stores: 0,
            warning_hook: None,
            pending_warnings: VecDeque::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Fails the struct-packing check.
    pub fn with_layout_mismatch(mut self) -> Self {
        self.layout_ok = false;
        self
    }

    /// Demands a relaunch through the Steam client.
    pub fn with_restart_required(mut self) -> Self {
        self.restart_required = true;
        self
    }

    /// Fails the relaunch check as if `library` could not be loaded.
    pub fn with_missing_library(mut self, library: impl Into<String>) -> Self {
        self.missing_library = Some(library.into());
        self
    }

    /// Fails API init with `reason`.
    pub fn with_init_failure(mut self, reason: impl Into<String>) -> Self {
        self.init_error = Some(reason.into());
        self
    }

    pub fn with_steam_id(mut self, steam_id: SteamId) -> Self {
        self.steam_id = steam_id;
        self
    }

    /// Connects controllers; each gets the handle `index + 1`.
    pub fn with_controllers(mut self, controllers: impl IntoIterator<Item = InputType>) -> Self {
        self.controllers = controllers.into_iter().collect();
        self
    }

    /// Defines an achievement.
    pub fn with_achievement(mut self, name: impl Into<String>, unlocked: bool) -> Self {
        self.achievements.insert(name.into(), unlocked);
        self
    }

    /// Defines an integer stat.
    pub fn with_stat(mut self, name: impl Into<String>, value: i32) -> Self {
        self.stats.insert(name.into(), value);
        self
    }

    pub fn disconnect_all(&mut self) {
        self.controllers.clear();
    }

    /// Queues a warning for delivery on the next `run_callbacks`.
    pub fn queue_warning(&mut self, severity: i32, text: impl Into<String>) {
        self.pending_warnings.push_back((severity, text.into()));
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn has_warning_hook(&self) -> bool {
        self.warning_hook.is_some()
    }

    /// Current value of a stat, read without going through the SDK surface.
    pub fn stat(&self, name: &str) -> Option<i32> {
        self.stats.get(name).copied()
    }

    /// Current unlock flag of an achievement, read without going through
    /// the SDK surface.
    pub fn unlocked(&self, name: &str) -> Option<bool> {
        self.achievements.get(name).copied()
    }

    /// Number of successful `store_stats` calls.
    pub fn stores(&self) -> usize {
        self.stores
    }

    /// Snapshot of every SDK call made so far.
    pub fn calls(&self) -> Vec<SdkCall> {
        self.calls.borrow().clone()
    }

    /// Number of recorded calls equal to `call`.
    pub fn count(&self, call: &SdkCall) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: SdkCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Default for OfflineSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl SteamSdk for OfflineSdk {
    fn layout_compatible(&self) -> bool {
        self.record(SdkCall::LayoutCheck);
        self.layout_ok
    }

    fn restart_app_if_necessary(&mut self, app_id: AppId) -> Result<bool, SdkError> {
        self.record(SdkCall::RestartCheck(app_id));
        if let Some(library) = &self.missing_library {
            return Err(SdkError::LibraryMissing(library.clone()));
        }
        Ok(self.restart_required)
    }

    fn init(&mut self) -> Result<(), SdkError> {
        self.record(SdkCall::Init);
        if let Some(reason) = &self.init_error {
            return Err(SdkError::InitFailed(reason.clone()));
        }
        self.initialized = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.record(SdkCall::Shutdown);
        self.initialized = false;
        self.warning_hook = None;
    }

    fn run_callbacks(&mut self) {
        self.record(SdkCall::RunCallbacks);
        while let Some((severity, text)) = self.pending_warnings.pop_front() {
            if let Some(hook) = &self.warning_hook {
                hook(severity, &text);
            }
        }
    }

    fn install_warning_hook(&mut self, hook: WarningHook) -> bool {
        self.record(SdkCall::InstallWarningHook);
        self.warning_hook = Some(hook);
        true
    }

    fn connected_controllers(&mut self, handles: &mut [InputHandle]) -> usize {
        self.record(SdkCall::ConnectedControllers(handles.len()));
        let count = self.controllers.len().min(handles.len());
        for (slot, handle) in handles.iter_mut().take(count).enumerate() {
            *handle = slot as InputHandle + 1;
        }
        count
    }

    fn input_type(&self, handle: InputHandle) -> InputType {
        self.record(SdkCall::InputType(handle));
        handle
            .checked_sub(1)
            .and_then(|index| self.controllers.get(index as usize))
            .copied()
            .unwrap_or(InputType::Unknown)
    }

    fn achievement(&self, name: &str) -> Option<bool> {
        self.record(SdkCall::Achievement(name.to_string()));
        if !self.initialized {
            return None;
        }
        self.achievements.get(name).copied()
    }

    fn request_current_stats(&mut self) -> bool {
        self.record(SdkCall::RequestCurrentStats);
        self.initialized
    }

    fn set_achievement(&mut self, name: &str) -> bool {
        self.record(SdkCall::SetAchievement(name.to_string()));
        if !self.initialized {
            return false;
        }
        match self.achievements.get_mut(name) {
            Some(unlocked) => {
                *unlocked = true;
                true
            }
            None => false,
        }
    }

    fn set_stat_i32(&mut self, name: &str, value: i32) -> bool {
        self.record(SdkCall::SetStat(name.to_string(), value));
        if !self.initialized {
            return false;
        }
        match self.stats.get_mut(name) {
            Some(stat) => {
                *stat = value;
                true
            }
            None => false,
        }
    }

    fn store_stats(&mut self) -> bool {
        self.record(SdkCall::StoreStats);
        if !self.initialized {
            return false;
        }
        self.stores += 1;
        true
    }

    fn user_id(&self) -> SteamId {
        self.record(SdkCall::UserId);
        self.steam_id
    }
}
