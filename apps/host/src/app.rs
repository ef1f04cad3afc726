//! Host loop: owns the Steam session and drives its lifecycle.

use std::future::Future;

use steamgate_session::{SessionError, SessionManager, SessionState, SteamSdk};
use tokio::time::{Interval, MissedTickBehavior};

use crate::config::Config;

/// How a host run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The loop ran until shutdown was requested.
    Completed { ticks: u64, final_state: SessionState },
    /// Session startup demanded that the process exit.
    Quit(SessionError),
}

/// Runs the host until Ctrl-C.
pub async fn run<S: SteamSdk>(config: &Config, sdk: S) -> anyhow::Result<Outcome> {
    run_until(config, sdk, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {e}");
            return;
        }
        tracing::info!("SIGINT received, shutting down");
    })
    .await
}

/// Runs the host until `shutdown` resolves.
pub async fn run_until<S, F>(config: &Config, sdk: S, shutdown: F) -> anyhow::Result<Outcome>
where
    S: SteamSdk,
    F: Future<Output = ()>,
{
    let mut session = SessionManager::new(sdk, config.session.clone());

    match session.start() {
        Ok(state) => tracing::info!(%state, "steam session ready"),
        Err(e) if e.is_fatal() => {
            tracing::error!("quitting: {e}");
            return Ok(Outcome::Quit(e));
        }
        Err(e) => tracing::warn!("continuing without steam: {e}"),
    }

    session.enable();
    if let Some(user_id) = session.user_id() {
        tracing::info!(%user_id, "signed in");
    }

    let mut ticker = tokio::time::interval(config.tick_period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut report = (config.report_interval_secs > 0).then(|| {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(config.report_interval_secs));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    tokio::pin!(shutdown);
    let mut ticks = 0u64;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                session.poll();
                ticks += 1;
            }
            _ = next_report(&mut report) => report_controllers(&mut session),
        }
    }

    session.stop();
    tracing::info!(ticks, "host loop finished");

    Ok(Outcome::Completed {
        ticks,
        final_state: session.state(),
    })
}

/// Waits for the next report tick, or forever when reporting is off.
async fn next_report(report: &mut Option<Interval>) {
    match report {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn report_controllers<S: SteamSdk>(session: &mut SessionManager<S>) {
    let devices = session.connected_input_types();
    let names = devices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    tracing::info!(count = devices.len(), devices = %names, "connected controllers");
}
