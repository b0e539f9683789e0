//! Scratch Reaper Task
//!
//! Background task that periodically sweeps expired scratch files.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::scratch::ScratchRegistry;

/// Spawns a background task that sweeps the registry on a fixed interval.
///
/// The first sweep runs immediately so files left behind by a previous
/// process are reconciled at start-up. Each sweep runs in its own task: a
/// panic inside one sweep is logged and the loop carries on.
///
/// The task stops when `true` is sent on `shutdown` or the sender is dropped.
///
/// # Arguments
/// * `registry` - Shared registry to sweep
/// * `sweep_interval` - Pause between sweeps
/// * `shutdown` - Receiver half of the shutdown channel
///
/// # Example
/// ```ignore
/// let (shutdown_tx, shutdown_rx) = watch::channel(false);
/// let handle = spawn_reaper_task(registry.clone(), Duration::from_secs(900), shutdown_rx);
/// // Later, during shutdown:
/// shutdown_tx.send(true).ok();
/// handle.await.ok();
/// ```
pub fn spawn_reaper_task(
    registry: Arc<ScratchRegistry>,
    sweep_interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting scratch reaper with interval of {} seconds",
            sweep_interval.as_secs()
        );

        let mut ticker = tokio::time::interval(sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        debug!("Shutdown sender dropped");
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            let sweep_registry = Arc::clone(&registry);
            match tokio::spawn(async move { sweep_registry.sweep().await }).await {
                Ok(report) if report.deleted() > 0 => {
                    let total = registry.stats().await.total_reaped();
                    info!(
                        "Scratch reaper: removed {} expired files ({} since start)",
                        report.deleted(),
                        total
                    );
                }
                Ok(_) => debug!("Scratch reaper: no expired files found"),
                Err(e) => error!("Scratch reaper sweep aborted: {}", e),
            }
        }

        info!("Scratch reaper stopped");
    })
}
