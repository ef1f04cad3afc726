//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::input::STEAM_INPUT_MAX_COUNT;
use crate::sdk::AppId;

/// Settings for a [`SessionManager`](crate::SessionManager).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// App ID passed to the relaunch check. `0` skips the storefront target.
    #[serde(default = "default_app_id")]
    pub app_id: AppId,

    /// When `false` the session never starts and every query returns its
    /// safe default. Used on platforms without a Steam client.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Controller slots polled per query (1..=16).
    #[serde(default = "default_input_slots")]
    pub input_slots: usize,

    /// Route SDK warning text into the log once the session is enabled.
    #[serde(default = "default_true")]
    pub forward_sdk_warnings: bool,
}

fn default_app_id() -> AppId {
    AppId::INVALID
}

fn default_true() -> bool {
    true
}

fn default_input_slots() -> usize {
    STEAM_INPUT_MAX_COUNT
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            app_id: default_app_id(),
            enabled: default_true(),
            input_slots: default_input_slots(),
            forward_sdk_warnings: default_true(),
        }
    }
}

impl SessionConfig {
    pub fn with_app_id(mut self, app_id: u32) -> Self {
        self.app_id = AppId(app_id);
        self
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}
