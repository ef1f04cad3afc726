use std::fmt;

use serde::Serialize;

/// Lifecycle state of a Steam session.
///
/// Moves forward only: `Uninitialized` to `Initialized` or `Failed`, and
/// `Initialized` to `ShutDown`. [`SessionManager::reset`] is the single
/// explicit way back to `Uninitialized`.
///
/// [`SessionManager::reset`]: crate::SessionManager::reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    #[default]
    Uninitialized,
    Initialized,
    Failed,
    ShutDown,
}

impl SessionState {
    pub fn is_initialized(&self) -> bool {
        *self == Self::Initialized
    }

    /// Returns `true` once startup has been attempted and can no longer
    /// proceed without a reset.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::ShutDown)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Failed => "failed",
            Self::ShutDown => "shut down",
        };
        f.write_str(s)
    }
}
