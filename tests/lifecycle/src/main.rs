fn main() {
    println!("Run `cargo test -p lifecycle` to execute session lifecycle scenarios.");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use steamgate_session::{
        AppId, InputHandle, InputType, OfflineSdk, STEAM_INPUT_MAX_COUNT, SdkCall, SdkError,
        SessionConfig, SessionError, SessionManager, SessionState, SteamId, SteamSdk, WarningHook,
    };

    /// Builds a manager over an offline backend with the default config.
    fn session(sdk: OfflineSdk) -> SessionManager<OfflineSdk> {
        SessionManager::new(sdk, SessionConfig::default().with_app_id(480))
    }

    #[test]
    fn fresh_process_all_stages_succeed() {
        let mut manager = session(
            OfflineSdk::new()
                .with_achievement("ach1", true)
                .with_achievement("ach2", false),
        );

        assert_eq!(manager.start(), Ok(SessionState::Initialized));
        assert_eq!(manager.try_get_achievement("ach1"), Some(true));
        assert_eq!(manager.try_get_achievement("ach2"), Some(false));
    }

    #[test]
    fn start_twice_matches_start_once() {
        let mut once = session(OfflineSdk::new());
        once.start().unwrap();

        let mut twice = session(OfflineSdk::new());
        twice.start().unwrap();
        twice.start().unwrap();

        assert_eq!(once.state(), twice.state());
        assert_eq!(once.sdk().calls(), twice.sdk().calls());
    }

    #[test]
    fn relaunch_exits_before_api_init() {
        let mut manager = session(OfflineSdk::new().with_restart_required());

        let err = manager.start().unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(manager.sdk().count(&SdkCall::Init), 0);
        assert_ne!(manager.state(), SessionState::Initialized);

        // Nothing brings it back without an explicit reset.
        assert_eq!(manager.start(), Ok(SessionState::Failed));
        assert!(!manager.is_initialized());
    }

    #[test]
    fn failed_session_degrades_every_query() {
        for sdk in [
            OfflineSdk::new().with_layout_mismatch(),
            OfflineSdk::new().with_init_failure("no steam client"),
        ] {
            let mut manager = session(
                sdk.with_achievement("ACH", false)
                    .with_stat("kills", 0)
                    .with_controllers([InputType::PS4Controller]),
            );
            let err = manager.start().unwrap_err();
            assert!(!err.is_fatal());
            let before = manager.sdk().calls().len();

            assert_eq!(manager.try_get_achievement("ACH"), None);
            assert!(!manager.set_achievement("ACH"));
            assert!(!manager.set_stat("kills", 1));
            assert!(manager.connected_input_types().is_empty());
            manager.poll();
            assert_eq!(manager.sdk().calls().len(), before);
        }
    }

    #[test]
    fn backend_released_once_and_never_pumped_after() {
        let mut manager = session(OfflineSdk::new());
        manager.start().unwrap();
        manager.poll();

        manager.stop();
        manager.poll();
        manager.stop();
        assert_eq!(manager.start(), Ok(SessionState::ShutDown));
        manager.poll();

        let calls = manager.sdk().calls();
        let shutdown_at = calls
            .iter()
            .position(|c| *c == SdkCall::Shutdown)
            .unwrap();
        assert_eq!(manager.sdk().count(&SdkCall::Shutdown), 1);
        assert!(
            calls[shutdown_at + 1..]
                .iter()
                .all(|c| *c != SdkCall::RunCallbacks)
        );
        assert!(!manager.sdk().is_initialized());
    }

    #[test]
    fn init_failure_reports_reason() {
        let mut manager = session(OfflineSdk::new().with_init_failure("steam not running"));
        assert_eq!(
            manager.start(),
            Err(SessionError::InitFailed("steam not running".into()))
        );
    }

    #[test]
    fn full_frame_lifecycle() {
        let sdk = OfflineSdk::new()
            .with_achievement("ACH_FIRST_BLOOD", false)
            .with_stat("kills", 0)
            .with_controllers([
                InputType::SteamDeckController,
                InputType::Unknown,
                InputType::PS5Controller,
            ]);
        let mut manager = session(sdk);

        manager.start().unwrap();
        manager.enable();

        for frame in 1..=3 {
            manager.poll();
            assert!(manager.set_stat("kills", frame));
        }
        assert!(manager.set_achievement("ACH_FIRST_BLOOD"));
        assert_eq!(manager.try_get_achievement("ACH_FIRST_BLOOD"), Some(true));
        assert_eq!(manager.sdk().stat("kills"), Some(3));
        assert_eq!(manager.sdk().stores(), 4);

        let devices = manager.connected_input_types();
        assert_eq!(
            devices,
            vec![InputType::SteamDeckController, InputType::PS5Controller]
        );
        assert!(devices.len() <= STEAM_INPUT_MAX_COUNT);

        manager.stop();
        manager.stop();
        assert_eq!(manager.state(), SessionState::ShutDown);
        assert_eq!(manager.sdk().count(&SdkCall::Shutdown), 1);
        assert_eq!(manager.sdk().count(&SdkCall::RunCallbacks), 3);
    }

    #[test]
    fn many_controllers_capped_at_max() {
        let controllers = [InputType::GenericGamepad; STEAM_INPUT_MAX_COUNT + 4];
        let mut manager = session(OfflineSdk::new().with_controllers(controllers));
        manager.start().unwrap();

        let devices = manager.connected_input_types();
        assert_eq!(devices.len(), STEAM_INPUT_MAX_COUNT);
        assert!(devices.iter().all(|d| *d != InputType::Unknown));
    }

    /// Backend wrapper that flags shutdown on a shared cell.
    struct Tracked {
        inner: OfflineSdk,
        shut_down: Arc<AtomicBool>,
    }

    impl SteamSdk for Tracked {
        fn layout_compatible(&self) -> bool {
            self.inner.layout_compatible()
        }
        fn restart_app_if_necessary(&mut self, app_id: AppId) -> Result<bool, SdkError> {
            self.inner.restart_app_if_necessary(app_id)
        }
        fn init(&mut self) -> Result<(), SdkError> {
            self.inner.init()
        }
        fn shutdown(&mut self) {
            self.shut_down.store(true, Ordering::SeqCst);
            self.inner.shutdown();
        }
        fn run_callbacks(&mut self) {
            self.inner.run_callbacks();
        }
        fn install_warning_hook(&mut self, hook: WarningHook) -> bool {
            self.inner.install_warning_hook(hook)
        }
        fn connected_controllers(&mut self, handles: &mut [InputHandle]) -> usize {
            self.inner.connected_controllers(handles)
        }
        fn input_type(&self, handle: InputHandle) -> InputType {
            self.inner.input_type(handle)
        }
        fn achievement(&self, name: &str) -> Option<bool> {
            self.inner.achievement(name)
        }
        fn request_current_stats(&mut self) -> bool {
            self.inner.request_current_stats()
        }
        fn set_achievement(&mut self, name: &str) -> bool {
            self.inner.set_achievement(name)
        }
        fn set_stat_i32(&mut self, name: &str, value: i32) -> bool {
            self.inner.set_stat_i32(name, value)
        }
        fn store_stats(&mut self) -> bool {
            self.inner.store_stats()
        }
        fn user_id(&self) -> SteamId {
            self.inner.user_id()
        }
    }

    fn tracked() -> (Tracked, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(false));
        let sdk = Tracked {
            inner: OfflineSdk::new(),
            shut_down: Arc::clone(&flag),
        };
        (sdk, flag)
    }

    #[test]
    fn drop_releases_live_session() {
        let (sdk, shut_down) = tracked();
        let mut manager = SessionManager::new(sdk, SessionConfig::default());
        manager.start().unwrap();
        assert!(!shut_down.load(Ordering::SeqCst));

        drop(manager);
        assert!(shut_down.load(Ordering::SeqCst));
    }

    #[test]
    fn drop_without_start_skips_shutdown() {
        let (sdk, shut_down) = tracked();
        drop(SessionManager::new(sdk, SessionConfig::default()));
        assert!(!shut_down.load(Ordering::SeqCst));
    }
}
