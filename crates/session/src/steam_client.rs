//! Steamworks SDK backend over the `steamworks` crate.

use steamworks::sys::{self, ESteamInputType};
use steamworks::{Client, SingleClient};

use crate::input::InputType;
use crate::sdk::{
    AppId, InputHandle, SdkError, SteamId, SteamSdk, WarningHook, packing_sentinel_matches,
};

/// Backend talking to the real Steam client.
pub struct SteamworksSdk {
    app_id: AppId,
    client: Option<Client>,
    single: Option<SingleClient>,
    input_ready: bool,
}

impl SteamworksSdk {
    pub fn new() -> Self {
        Self {
            app_id: AppId::INVALID,
            client: None,
            single: None,
            input_ready: false,
        }
    }
}

impl Default for SteamworksSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl SteamSdk for SteamworksSdk {
    fn layout_compatible(&self) -> bool {
        packing_sentinel_matches()
    }

    fn restart_app_if_necessary(&mut self, app_id: AppId) -> Result<bool, SdkError> {
        self.app_id = app_id;
        Ok(steamworks::restart_app_if_necessary(steamworks::AppId(app_id.0)))
    }

    fn init(&mut self) -> Result<(), SdkError> {
        // Without an app ID the client reads steam_appid.txt.
        let result = if self.app_id.is_valid() {
            Client::init_app(self.app_id.0)
        } else {
            Client::init()
        };
        let (client, single) = result.map_err(|e| SdkError::InitFailed(e.to_string()))?;

        // Steam Input frames advance with run_callbacks.
        client.input().init(false);
        self.input_ready = true;

        self.client = Some(client);
        self.single = Some(single);
        Ok(())
    }

    fn shutdown(&mut self) {
        if let Some(client) = &self.client
            && self.input_ready
        {
            client.input().shutdown();
        }
        self.input_ready = false;
        self.single = None;
        // Dropping the last client handle calls SteamAPI_Shutdown.
        self.client = None;
    }

    fn run_callbacks(&mut self) {
        if let Some(single) = &self.single {
            single.run_callbacks();
        }
    }

    fn install_warning_hook(&mut self, hook: WarningHook) -> bool {
        let Some(client) = &self.client else {
            return false;
        };
        client.utils().set_warning_callback(move |severity, text| {
            hook(severity, &*text.to_string_lossy());
        });
        true
    }

    fn connected_controllers(&mut self, handles: &mut [InputHandle]) -> usize {
        let Some(client) = &self.client else {
            return 0;
        };
        if !self.input_ready {
            return 0;
        }

        // The SDK writes up to STEAM_INPUT_MAX_COUNT handles and asserts
        // on anything shorter.
        if handles.len() < sys::STEAM_INPUT_MAX_COUNT as usize {
            tracing::warn!(len = handles.len(), "controller buffer too small, skipping poll");
            return 0;
        }

        let input = client.input();
        input.run_frame();
        input
            .get_connected_controllers_slice(&mut *handles)
            .min(handles.len())
    }

    fn input_type(&self, handle: InputHandle) -> InputType {
        if self.client.is_none() || !self.input_ready {
            return InputType::Unknown;
        }
        // SAFETY: the client is alive and Steam Input was initialised in
        // `init`, so the interface pointer is valid.
        let raw = unsafe {
            let input = sys::SteamAPI_SteamInput_v006();
            sys::SteamAPI_ISteamInput_GetInputTypeForHandle(input, handle)
        };
        input_type_from_sdk(raw)
    }

    fn achievement(&self, name: &str) -> Option<bool> {
        let client = self.client.as_ref()?;
        client.user_stats().achievement(name).get().ok()
    }

    fn request_current_stats(&mut self) -> bool {
        match &self.client {
            Some(client) => {
                client.user_stats().request_current_stats();
                true
            }
            None => false,
        }
    }

    fn set_achievement(&mut self, name: &str) -> bool {
        self.client
            .as_ref()
            .is_some_and(|client| client.user_stats().achievement(name).set().is_ok())
    }

    fn set_stat_i32(&mut self, name: &str, value: i32) -> bool {
        self.client
            .as_ref()
            .is_some_and(|client| client.user_stats().set_stat_i32(name, value).is_ok())
    }

    fn store_stats(&mut self) -> bool {
        self.client
            .as_ref()
            .is_some_and(|client| client.user_stats().store_stats().is_ok())
    }

    fn user_id(&self) -> SteamId {
        self.client
            .as_ref()
            .map(|client| SteamId(client.user().steam_id().raw()))
            .unwrap_or(SteamId(0))
    }
}

/// Maps the SDK device type onto [`InputType`].
fn input_type_from_sdk(raw: ESteamInputType) -> InputType {
    match raw {
        ESteamInputType::k_ESteamInputType_SteamController => InputType::SteamController,
        ESteamInputType::k_ESteamInputType_XBox360Controller => InputType::XBox360Controller,
        ESteamInputType::k_ESteamInputType_XBoxOneController => InputType::XBoxOneController,
        ESteamInputType::k_ESteamInputType_GenericGamepad => InputType::GenericGamepad,
        ESteamInputType::k_ESteamInputType_PS4Controller => InputType::PS4Controller,
        ESteamInputType::k_ESteamInputType_AppleMFiController => InputType::AppleMFiController,
        ESteamInputType::k_ESteamInputType_AndroidController => InputType::AndroidController,
        ESteamInputType::k_ESteamInputType_SwitchJoyConPair => InputType::SwitchJoyConPair,
        ESteamInputType::k_ESteamInputType_SwitchJoyConSingle => InputType::SwitchJoyConSingle,
        ESteamInputType::k_ESteamInputType_SwitchProController => InputType::SwitchProController,
        ESteamInputType::k_ESteamInputType_MobileTouch => InputType::MobileTouch,
        ESteamInputType::k_ESteamInputType_PS3Controller => InputType::PS3Controller,
        ESteamInputType::k_ESteamInputType_PS5Controller => InputType::PS5Controller,
        ESteamInputType::k_ESteamInputType_SteamDeckController => InputType::SteamDeckController,
        _ => InputType::Unknown,
    }
}
