//! SteamGate host entry point.

mod app;
mod config;

use steamgate_session::{OfflineSdk, SessionError};
use tracing_subscriber::EnvFilter;

use crate::app::Outcome;
use crate::config::{Backend, Config};

fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting SteamGate host"
    );

    let config = Config::load()?;
    tracing::info!(backend = ?config.backend, app_id = %config.session.app_id, "configuration loaded");

    // Session calls stay on one thread.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let outcome = match config.backend {
        Backend::Offline => rt.block_on(app::run(&config, OfflineSdk::new()))?,
        Backend::Steamworks => rt.block_on(run_steamworks(&config))?,
    };

    match outcome {
        Outcome::Completed { .. } => {
            tracing::info!("host shut down cleanly");
            Ok(())
        }
        // Steam relaunches the app itself; exit quietly.
        Outcome::Quit(SessionError::RestartRequired) => Ok(()),
        Outcome::Quit(e) => Err(e.into()),
    }
}

#[cfg(feature = "steamworks")]
async fn run_steamworks(config: &Config) -> anyhow::Result<Outcome> {
    app::run(config, steamgate_session::SteamworksSdk::new()).await
}

#[cfg(not(feature = "steamworks"))]
async fn run_steamworks(_config: &Config) -> anyhow::Result<Outcome> {
    anyhow::bail!("steamworks backend requested but the host was built without the `steamworks` feature")
}
