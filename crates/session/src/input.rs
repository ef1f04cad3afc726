//! Connected input device enumeration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sdk::{InputHandle, SteamSdk};

/// Maximum number of controllers Steam Input reports at once.
pub const STEAM_INPUT_MAX_COUNT: usize = 16;

/// Steam Input device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputType {
    Unknown,
    SteamController,
    XBox360Controller,
    XBoxOneController,
    GenericGamepad,
    PS4Controller,
    AppleMFiController,
    AndroidController,
    SwitchJoyConPair,
    SwitchJoyConSingle,
    SwitchProController,
    MobileTouch,
    PS3Controller,
    PS5Controller,
    SteamDeckController,
}

impl InputType {
    /// Returns the device type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::SteamController => "SteamController",
            Self::XBox360Controller => "XBox360Controller",
            Self::XBoxOneController => "XBoxOneController",
            Self::GenericGamepad => "GenericGamepad",
            Self::PS4Controller => "PS4Controller",
            Self::AppleMFiController => "AppleMFiController",
            Self::AndroidController => "AndroidController",
            Self::SwitchJoyConPair => "SwitchJoyConPair",
            Self::SwitchJoyConSingle => "SwitchJoyConSingle",
            Self::SwitchProController => "SwitchProController",
            Self::MobileTouch => "MobileTouch",
            Self::PS3Controller => "PS3Controller",
            Self::PS5Controller => "PS5Controller",
            Self::SteamDeckController => "SteamDeckController",
        }
    }

    /// Parses a device type name. Unrecognized names map to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "SteamController" => Self::SteamController,
            "XBox360Controller" => Self::XBox360Controller,
            "XBoxOneController" => Self::XBoxOneController,
            "GenericGamepad" => Self::GenericGamepad,
            "PS4Controller" => Self::PS4Controller,
            "AppleMFiController" => Self::AppleMFiController,
            "AndroidController" => Self::AndroidController,
            "SwitchJoyConPair" => Self::SwitchJoyConPair,
            "SwitchJoyConSingle" => Self::SwitchJoyConSingle,
            "SwitchProController" => Self::SwitchProController,
            "MobileTouch" => Self::MobileTouch,
            "PS3Controller" => Self::PS3Controller,
            "PS5Controller" => Self::PS5Controller,
            "SteamDeckController" => Self::SteamDeckController,
            _ => Self::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Self::Unknown
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reusable controller poll buffer.
///
/// The SDK always writes into a full `STEAM_INPUT_MAX_COUNT` buffer, which
/// is cleared before every poll so stale handles from a previous frame
/// never leak into the result. Only the first `limit` reported handles are
/// resolved to device types.
#[derive(Debug)]
pub struct InputPoller {
    handles: [InputHandle; STEAM_INPUT_MAX_COUNT],
    limit: usize,
}

impl InputPoller {
    /// Creates a poller that reports at most `slots` controllers, clamped to
    /// `1..=STEAM_INPUT_MAX_COUNT`.
    pub fn new(slots: usize) -> Self {
        Self {
            handles: [0; STEAM_INPUT_MAX_COUNT],
            limit: slots.clamp(1, STEAM_INPUT_MAX_COUNT),
        }
    }

    pub fn slots(&self) -> usize {
        self.limit
    }

    /// Queries connected controllers and returns their known device types.
    pub fn poll<S: SteamSdk + ?Sized>(&mut self, sdk: &mut S) -> Vec<InputType> {
        self.handles.fill(0);
        let count = sdk
            .connected_controllers(&mut self.handles)
            .min(self.limit);

        self.handles[..count]
            .iter()
            .map(|&handle| sdk.input_type(handle))
            .filter(InputType::is_known)
            .collect()
    }
}

impl Default for InputPoller {
    fn default() -> Self {
        Self::new(STEAM_INPUT_MAX_COUNT)
    }
}
