//! Recurring sweep task

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::engine::DisplayEngine;
use super::viewer::ViewerPresence;
use super::WaypointDisplay;

/// Drive [`DisplayEngine::tick`] at the engine's update interval.
///
/// While no session is Shown the task parks until the next `show` instead
/// of ticking over an empty table. Any change on `shutdown` (or dropping
/// its sender) stops the task after the current sweep.
pub fn spawn_scheduler<D, P>(
    engine: Arc<DisplayEngine<D, P>>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    D: WaypointDisplay + 'static,
    P: ViewerPresence + 'static,
{
    tokio::spawn(async move {
        let period = engine.update_interval();
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(period_ms = period.as_millis() as u64, "Display scheduler started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            if engine.scheduled_count() == 0 {
                tracing::trace!("No sessions, scheduler parked");
                tokio::select! {
                    _ = engine.wake().notified() => {
                        // Give the new session a full period before its first refresh
                        interval.reset();
                    }
                    _ = shutdown.changed() => break,
                }
                continue;
            }

            tokio::select! {
                _ = interval.tick() => {}
                _ = shutdown.changed() => break,
            }

            // Emptied while waiting for the tick
            if engine.scheduled_count() == 0 {
                continue;
            }
            engine.tick();
        }

        tracing::info!("Display scheduler stopped");
    })
}
