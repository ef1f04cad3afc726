//! Host configuration management.
//!
//! Configuration is stored as TOML at `$STEAMGATE_CONFIG`, or else at
//! `steamgate/host.toml` under the user's config directory.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use steamgate_session::SessionConfig;

/// Environment variable overriding the configuration path.
pub const CONFIG_ENV: &str = "STEAMGATE_CONFIG";

/// SDK backend the host drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-memory backend, no Steam client required.
    Offline,
    /// Real Steam client (requires the `steamworks` feature).
    Steamworks,
}

/// Host configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_backend")]
    pub backend: Backend,

    /// Callback pump rate in ticks per second.
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: u32,

    /// Seconds between connected-controller reports (0 = never).
    #[serde(default = "default_report_interval")]
    pub report_interval_secs: u64,

    #[serde(default)]
    pub session: SessionConfig,
}

fn default_backend() -> Backend {
    if cfg!(feature = "steamworks") {
        Backend::Steamworks
    } else {
        Backend::Offline
    }
}

fn default_tick_rate() -> u32 {
    60
}

fn default_report_interval() -> u64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            tick_rate_hz: default_tick_rate(),
            report_interval_secs: default_report_interval(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path())
    }

    /// Loads configuration from `path`, writing defaults there if missing.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .with_context(|| format!("invalid config {}", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no config found, writing defaults");
                let config = Config::default();
                config.save_to(path)?;
                Ok(config)
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    /// Saves the configuration to `path`, readable by the owner only on Unix.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)
            .with_context(|| format!("writing {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Tick period derived from `tick_rate_hz` (at least 1 Hz).
    pub fn tick_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs(1) / self.tick_rate_hz.max(1)
    }
}

fn config_path() -> PathBuf {
    resolve_config_path(|key| std::env::var_os(key))
}

/// Picks the config file from `var` lookups. The user config directory is
/// `%APPDATA%` on Windows and `$XDG_CONFIG_HOME` or `~/.config` elsewhere;
/// without one the path is relative to the working directory.
fn resolve_config_path(var: impl Fn(&str) -> Option<OsString>) -> PathBuf {
    if let Some(path) = var(CONFIG_ENV) {
        return PathBuf::from(path);
    }

    let config_dir = if cfg!(windows) {
        var("APPDATA").map(PathBuf::from)
    } else {
        var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| var("HOME").map(|home| PathBuf::from(home).join(".config")))
    };
    config_dir
        .unwrap_or_default()
        .join("steamgate")
        .join("host.toml")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use steamgate_session::AppId;

    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.tick_rate_hz, 60);
        assert_eq!(config.report_interval_secs, 5);
        assert_eq!(config.session, SessionConfig::default());
    }

    #[test]
    fn config_partial_toml() {
        let toml_str = r#"
backend = "offline"

[session]
app_id = 480
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend, Backend::Offline);
        assert_eq!(config.tick_rate_hz, 60);
        assert_eq!(config.session.app_id, AppId(480));
        assert!(config.session.enabled);
    }

    #[test]
    fn config_rejects_unknown_backend() {
        let result: Result<Config, _> = toml::from_str(r#"backend = "epic""#);
        assert!(result.is_err());
    }

    #[test]
    fn tick_period_clamps_zero() {
        let config = Config {
            tick_rate_hz: 0,
            ..Config::default()
        };
        assert_eq!(config.tick_period(), Duration::from_secs(1));

        let config = Config {
            tick_rate_hz: 50,
            ..Config::default()
        };
        assert_eq!(config.tick_period(), Duration::from_millis(20));
    }

    #[test]
    fn load_creates_default_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("host.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("host.toml");

        let config = Config {
            backend: Backend::Offline,
            tick_rate_hz: 30,
            report_interval_secs: 0,
            session: SessionConfig::default().with_app_id(730),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_reports_invalid_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("host.toml");
        std::fs::write(&path, "tick_rate_hz = \"fast\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let pairs: Vec<(String, OsString)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn config_path_env_override_wins() {
        let path = resolve_config_path(vars(&[
            (CONFIG_ENV, "/etc/steamgate.toml"),
            ("HOME", "/home/player"),
            ("APPDATA", "C:\\Users\\player\\AppData\\Roaming"),
        ]));
        assert_eq!(path, PathBuf::from("/etc/steamgate.toml"));
    }

    #[cfg(not(windows))]
    #[test]
    fn config_path_uses_user_config_dir() {
        let path = resolve_config_path(vars(&[("HOME", "/home/player")]));
        assert_eq!(path, PathBuf::from("/home/player/.config/steamgate/host.toml"));

        let path = resolve_config_path(vars(&[
            ("XDG_CONFIG_HOME", "/data/config"),
            ("HOME", "/home/player"),
        ]));
        assert_eq!(path, PathBuf::from("/data/config/steamgate/host.toml"));
    }

    #[test]
    fn config_path_without_config_dir_is_relative() {
        let path = resolve_config_path(vars(&[]));
        assert_eq!(path, Path::new("steamgate").join("host.toml"));
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("host.toml");
        Config::default().save_to(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
