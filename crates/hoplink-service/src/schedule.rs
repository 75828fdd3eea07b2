use crate::reaper::Reaper;
use hoplink_core::{LinkStore, UrlCache};
use jiff::Timestamp;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Dual-cadence driver for the [`Reaper`].
///
/// Runs a coarse full sweep (daily-scale in production) and a fine
/// watchdog check (hourly-scale) on independent tickers. The loop itself
/// never fails; the reaper absorbs all backend errors internally.
#[derive(Debug, Clone)]
pub struct ReaperSchedule {
    sweep_every: Duration,
    check_every: Duration,
}

impl ReaperSchedule {
    /// Creates a schedule with the given sweep and watchdog cadences.
    pub fn new(sweep_every: Duration, check_every: Duration) -> Self {
        Self {
            sweep_every,
            check_every,
        }
    }

    /// Spawns the schedule loop on the current Tokio runtime.
    ///
    /// The task runs until the handle is aborted or the runtime shuts
    /// down.
    pub fn spawn<S, C>(self, reaper: Reaper<S, C>) -> JoinHandle<()>
    where
        S: LinkStore,
        C: UrlCache,
    {
        tokio::spawn(self.run(reaper))
    }

    /// Drives the reaper forever on the two cadences.
    pub async fn run<S, C>(self, reaper: Reaper<S, C>)
    where
        S: LinkStore,
        C: UrlCache,
    {
        let mut sweep_tick = tokio::time::interval(self.sweep_every);
        let mut check_tick = tokio::time::interval(self.check_every);

        // An interval's first tick completes immediately; swallow both so
        // spawning does not trigger an instant sweep.
        sweep_tick.tick().await;
        check_tick.tick().await;

        debug!(
            sweep_every_secs = self.sweep_every.as_secs_f64(),
            check_every_secs = self.check_every.as_secs_f64(),
            "reaper schedule started"
        );

        loop {
            tokio::select! {
                _ = sweep_tick.tick() => {
                    reaper.sweep(Timestamp::now()).await;
                }
                _ = check_tick.tick() => {
                    reaper.check(Timestamp::now()).await;
                }
            }
        }
    }
}
