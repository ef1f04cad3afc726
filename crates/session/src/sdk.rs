//! The seam between the session manager and the Steam client SDK.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::input::InputType;

/// Steam application ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(pub u32);

impl AppId {
    /// Placeholder ID. The relaunch check treats it as "no target app".
    pub const INVALID: AppId = AppId(0);

    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 64-bit Steam ID of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SteamId(pub u64);

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque Steam Input controller handle. Zero is the empty slot.
pub type InputHandle = u64;

/// Callback receiving SDK warning text with its severity.
pub type WarningHook = Box<dyn Fn(i32, &str) + Send + Sync + 'static>;

/// Errors reported by an SDK backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SdkError {
    #[error("native library missing: {0}")]
    LibraryMissing(String),

    #[error("init failed: {0}")]
    InitFailed(String),
}

/// Steam client SDK operations used by the session manager.
///
/// Implementations wrap the native API one call per method. Methods
/// returning `bool` report the SDK's own success flag.
pub trait SteamSdk {
    /// Checks that the SDK's struct packing matches this binary.
    fn layout_compatible(&self) -> bool;

    /// Asks the SDK whether the process must be relaunched through the
    /// Steam client. `Err` means the native library could not be reached.
    fn restart_app_if_necessary(&mut self, app_id: AppId) -> Result<bool, SdkError>;

    /// Initializes the client API.
    fn init(&mut self) -> Result<(), SdkError>;

    /// Releases the client API.
    fn shutdown(&mut self);

    /// Dispatches pending SDK callbacks on the calling thread.
    fn run_callbacks(&mut self);

    /// Routes SDK warning messages to `hook`. Returns `false` if no hook
    /// was installed.
    fn install_warning_hook(&mut self, hook: WarningHook) -> bool;

    /// Fills `handles` with connected controllers and returns how many
    /// slots were written. Callers pass `STEAM_INPUT_MAX_COUNT` slots.
    fn connected_controllers(&mut self, handles: &mut [InputHandle]) -> usize;

    fn input_type(&self, handle: InputHandle) -> InputType;

    /// Returns the unlock flag of `name`, or `None` if no such achievement.
    fn achievement(&self, name: &str) -> Option<bool>;

    fn request_current_stats(&mut self) -> bool;

    fn set_achievement(&mut self, name: &str) -> bool;

    fn set_stat_i32(&mut self, name: &str, value: i32) -> bool;

    /// Persists pending stat and achievement changes to the Steam servers.
    fn store_stats(&mut self) -> bool;

    fn user_id(&self) -> SteamId;
}

/// Mirror of the SDK's packing sentinel, declared with the
/// packing the SDK uses on this target.
#[allow(dead_code)]
#[cfg_attr(
    any(target_os = "macos", all(target_os = "linux", target_pointer_width = "32")),
    repr(C, packed(4))
)]
#[cfg_attr(
    not(any(target_os = "macos", all(target_os = "linux", target_pointer_width = "32"))),
    repr(C)
)]
struct PackingSentinel {
    u32_field: u32,
    u64_field: u64,
    u16_field: u16,
    f64_field: f64,
}

/// Size the sentinel must have for the SDK's struct packing on this target.
///
/// The SDK packs at 4 bytes on macOS and 32-bit Linux, 8 bytes elsewhere.
pub const fn expected_sentinel_size() -> usize {
    if cfg!(any(
        target_os = "macos",
        all(target_os = "linux", target_pointer_width = "32")
    )) {
        24
    } else {
        32
    }
}

/// Returns `true` if this binary's struct layout matches what the SDK expects.
pub fn packing_sentinel_matches() -> bool {
    std::mem::size_of::<PackingSentinel>() == expected_sentinel_size()
}
