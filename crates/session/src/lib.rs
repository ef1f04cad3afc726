//! Steam session facade.
//!
//! Owns a Steam client session for its lifetime, sequences SDK startup and
//! shutdown, and exposes a small query/command surface: connected input
//! devices, achievement reads and writes, and stat writes. The SDK itself is
//! reached through the [`SteamSdk`] trait.

pub mod config;
pub mod input;
pub mod manager;
pub mod offline;
pub mod sdk;
pub mod state;
#[cfg(feature = "steamworks")]
pub mod steam_client;

// Re-export primary types.
pub use config::SessionConfig;
pub use input::{InputPoller, InputType, STEAM_INPUT_MAX_COUNT};
pub use manager::SessionManager;
pub use offline::{OfflineSdk, SdkCall};
pub use sdk::{
    AppId, InputHandle, SdkError, SteamId, SteamSdk, WarningHook, packing_sentinel_matches,
};
pub use state::SessionState;
#[cfg(feature = "steamworks")]
pub use steam_client::SteamworksSdk;

/// Errors raised while bringing a session up.
///
/// Every variant is logged where it is detected. Query operations never
/// surface these; they degrade to safe defaults instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("SDK binary layout check failed")]
    LayoutCheckFailed,

    #[error("Steam native library could not be loaded: {0}")]
    BinaryMissing(String),

    #[error("app must be relaunched through the Steam client")]
    RestartRequired,

    #[error("SteamAPI init failed: {0}")]
    InitFailed(String),
}

impl SessionError {
    /// Returns `true` if the hosting process must terminate.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RestartRequired | Self::BinaryMissing(_))
    }
}
