//! Periodic auto-refresh
//!
//! Re-runs the reload path on a fixed interval. Not coordinated with user
//! reloads; overlapping requests are resolved by the controller's generation
//! counter.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::controller::{RankingController, ReloadOutcome};

/// Spawn the refresh loop; it exits when `cancel` fires
pub fn spawn_refresh_task(
    controller: Arc<RankingController>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_secs = period.as_secs(), "Auto-refresh task started");

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // First tick completes immediately; the initial load is done by the caller
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Auto-refresh task stopped");
                    break;
                }
                _ = ticker.tick() => {
                    match controller.reload().await {
                        ReloadOutcome::Applied { airline_count } => {
                            debug!(airlines = airline_count, "Auto-refresh applied");
                        }
                        // Logged and broadcast by the controller
                        ReloadOutcome::Failed { .. } | ReloadOutcome::Discarded => {}
                    }
                }
            }
        }
    })
}
