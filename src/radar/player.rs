use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use anyhow::{anyhow, Result};
use tokio::{task::JoinHandle, time::{interval_at, Instant, MissedTickBehavior}};
use tracing::warn;

use super::{MapSurface, RadarScheduler};

/// Drives a [`RadarScheduler`] from a tokio interval.
///
/// The player owns at most one timer. Every call to [`RadarPlayer::set_playing`]
/// aborts the previous timer before anything else, so toggling quickly can never
/// leave two timers ticking the same scheduler. Must be used inside a tokio runtime.
pub struct RadarPlayer<M: MapSurface + Send + 'static> {
    scheduler: Arc<Mutex<RadarScheduler<M>>>,
    tick: Duration,
    timer: Option<JoinHandle<()>>,
}

impl<M: MapSurface + Send + 'static> RadarPlayer<M> {
    pub fn new(scheduler: RadarScheduler<M>) -> Self {
        let tick = scheduler.settings().tick;
        Self { scheduler: Arc::new(Mutex::new(scheduler)), tick, timer: None }
    }

    /// Shared handle to the scheduler, e.g. for inspecting the visible frame.
    #[inline] pub fn scheduler(&self) -> Arc<Mutex<RadarScheduler<M>>> { Arc::clone(&self.scheduler) }

    /// Whether a timer is installed and still ticking.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    pub fn set_playing(&mut self, playing: bool) -> Result<()> {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        if !playing {
            return self.lock()?.stop();
        }

        self.lock()?.play()?;
        let scheduler = Arc::clone(&self.scheduler);
        let tick = self.tick;
        self.timer = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + tick, tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Ok(mut guard) = scheduler.lock() else {
                    warn!("[radar] scheduler lock poisoned, playback stopped");
                    break;
                };
                if let Err(e) = guard.tick() {
                    warn!("[radar] frame tick failed: {e:#}");
                }
            }
        }));
        Ok(())
    }

    /// Stop the timer and remove every frame from the map.
    pub fn teardown(&mut self) -> Result<()> {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.lock()?.teardown()
    }

    fn lock(&self) -> Result<MutexGuard<'_, RadarScheduler<M>>> {
        self.scheduler.lock().map_err(|_| anyhow!("[RadarPlayer] scheduler lock poisoned"))
    }
}

impl<M: MapSurface + Send + 'static> Drop for RadarPlayer<M> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
