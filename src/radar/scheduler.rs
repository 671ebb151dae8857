use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, warn};

use super::{FrameTimeline, LayerId, MapSurface, WmsSource};

/// Frame count, spacing, playback rate and visible opacity of the radar loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSettings {
    pub count: usize,
    pub step: TimeDelta,
    pub tick: Duration,
    pub opacity: f64,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            count: 13,
            step: TimeDelta::minutes(10),
            tick: Duration::from_millis(500),
            opacity: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Idle,
    Playing,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    time: DateTime<Utc>,
    layer: LayerId,
}

/// Cross-fades a fixed set of pre-registered radar overlays.
///
/// Exactly one frame is visible while mounted: the latest one when idle, and the
/// current one while playing, advancing by one (wrapping) on every tick.
#[derive(Debug)]
pub struct RadarScheduler<M: MapSurface> {
    surface: M,
    source: WmsSource,
    settings: FrameSettings,
    frames: Vec<Frame>, // oldest first
    current: usize,
    state: PlayState,
}

impl<M: MapSurface> RadarScheduler<M> {
    pub fn new(surface: M, source: WmsSource, settings: FrameSettings) -> Self {
        Self { surface, source, settings, frames: Vec::new(), current: 0, state: PlayState::Idle }
    }

    #[inline] pub fn state(&self) -> PlayState { self.state }

    #[inline] pub fn settings(&self) -> &FrameSettings { &self.settings }

    #[inline] pub fn is_mounted(&self) -> bool { !self.frames.is_empty() }

    /// Number of registered frames.
    #[inline] pub fn len(&self) -> usize { self.frames.len() }

    /// Index of the visible frame, if mounted.
    #[inline] pub fn current(&self) -> Option<usize> { self.is_mounted().then_some(self.current) }

    #[inline] pub fn surface(&self) -> &M { &self.surface }

    #[inline] pub fn surface_mut(&mut self) -> &mut M { &mut self.surface }

    pub fn frame_times(&self) -> Vec<DateTime<Utc>> { self.frames.iter().map(|f| f.time).collect() }

    pub fn layers(&self) -> Vec<LayerId> { self.frames.iter().map(|f| f.layer).collect() }

    /// Register one invisible overlay per frame time ending at `now`, then reveal
    /// the first frame. When idle the latest frame is shown instead.
    /// Mounting again replaces the previous frames. If the surface rejects a frame,
    /// the frames added so far are removed again and the scheduler is left unmounted.
    pub fn mount(&mut self, now: DateTime<Utc>) -> Result<()> {
        let state = self.state;
        if self.is_mounted() {
            self.teardown()?;
        }
        self.state = state;

        let timeline = FrameTimeline::ending_at(now, self.settings.count, self.settings.step);
        for time in timeline.times() {
            match self.surface.add_overlay(&self.source.overlay(time)) {
                Ok(layer) => self.frames.push(Frame { time: *time, layer }),
                Err(e) => {
                    let added = self.frames.len();
                    if let Err(cleanup) = self.teardown() {
                        warn!("[radar] failed to remove partially mounted frames: {cleanup:#}");
                    }
                    self.state = state;
                    return Err(e.context(format!(
                        "[RadarScheduler.mount] frame {} of {}",
                        added + 1,
                        timeline.len()
                    )));
                }
            }
        }
        debug!("[radar] mounted {} frames", self.frames.len());

        self.current = 0;
        if let Some(first) = self.frames.first() {
            self.surface.set_opacity(first.layer, self.settings.opacity)?;
        }
        if self.state == PlayState::Idle {
            self.show_latest()?;
        }
        Ok(())
    }

    /// Start cycling; the next tick moves on from the visible frame.
    pub fn play(&mut self) -> Result<()> {
        self.state = PlayState::Playing;
        Ok(())
    }

    /// Stop cycling and pin the latest frame.
    pub fn stop(&mut self) -> Result<()> {
        self.state = PlayState::Idle;
        self.show_latest()
    }

    /// Advance one frame while playing. Returns the newly visible index.
    pub fn tick(&mut self) -> Result<Option<usize>> {
        if self.state != PlayState::Playing || self.frames.is_empty() {
            return Ok(None);
        }
        let next = (self.current + 1) % self.frames.len();
        self.surface.set_opacity(self.frames[self.current].layer, 0.0)?;
        self.surface.set_opacity(self.frames[next].layer, self.settings.opacity)?;
        self.current = next;
        Ok(Some(next))
    }

    /// Remove every frame from the map.
    pub fn teardown(&mut self) -> Result<()> {
        for frame in self.frames.drain(..) {
            self.surface.remove_layer(frame.layer)?;
        }
        self.current = 0;
        self.state = PlayState::Idle;
        Ok(())
    }

    fn show_latest(&mut self) -> Result<()> {
        let Some(last) = self.frames.len().checked_sub(1) else {
            return Ok(());
        };
        for (i, frame) in self.frames.iter().enumerate() {
            let opacity = if i == last { self.settings.opacity } else { 0.0 };
            self.surface.set_opacity(frame.layer, opacity)?;
        }
        self.current = last;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radar::{MemorySurface, OverlaySpec};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 1, 15, 18, 27, 0).unwrap() }

    fn mounted() -> RadarScheduler<MemorySurface> {
        let mut radar = RadarScheduler::new(MemorySurface::new(), WmsSource::default(), FrameSettings::default());
        radar.mount(now()).unwrap();
        radar
    }

    fn visible(radar: &RadarScheduler<MemorySurface>) -> Vec<usize> {
        let layers = radar.layers();
        radar.surface().visible().iter()
            .map(|id| layers.iter().position(|l| l == id).unwrap())
            .collect()
    }

    #[test]
    fn mount_registers_thirteen_frames_oldest_first() {
        let radar = mounted();
        assert_eq!(radar.surface().len(), 13);
        assert_eq!(radar.len(), 13);
        let times = radar.surface().times();
        assert_eq!(times.first(), Some(&"2024-01-15T16:20:00Z"));
        assert_eq!(times.last(), Some(&"2024-01-15T18:20:00Z"));
    }

    #[test]
    fn idle_shows_only_latest() {
        let radar = mounted();
        assert_eq!(radar.state(), PlayState::Idle);
        assert_eq!(visible(&radar), vec![12]);
        assert_eq!(radar.current(), Some(12));
        assert_eq!(radar.surface().opacity(radar.layers()[12]), Some(0.7));
    }

    #[test]
    fn ticks_advance_one_frame_and_wrap() {
        let mut radar = mounted();
        radar.play().unwrap();

        assert_eq!(radar.tick().unwrap(), Some(0));
        assert_eq!(visible(&radar), vec![0]);
        for expected in 1..13 {
            assert_eq!(radar.tick().unwrap(), Some(expected));
            assert_eq!(visible(&radar), vec![expected]);
        }
        assert_eq!(radar.tick().unwrap(), Some(0));
        assert_eq!(visible(&radar), vec![0]);
    }

    #[test]
    fn tick_while_idle_does_nothing() {
        let mut radar = mounted();
        assert_eq!(radar.tick().unwrap(), None);
        assert_eq!(visible(&radar), vec![12]);
    }

    #[test]
    fn stop_pins_latest() {
        let mut radar = mounted();
        radar.play().unwrap();
        radar.tick().unwrap();
        radar.tick().unwrap();
        radar.stop().unwrap();
        assert_eq!(visible(&radar), vec![12]);
        assert_eq!(radar.tick().unwrap(), None);
    }

    #[test]
    fn mount_while_playing_starts_at_first_frame() {
        let mut radar = RadarScheduler::new(MemorySurface::new(), WmsSource::default(), FrameSettings::default());
        radar.play().unwrap();
        radar.mount(now()).unwrap();
        assert_eq!(visible(&radar), vec![0]);
        assert_eq!(radar.tick().unwrap(), Some(1));
    }

    #[test]
    fn remount_replaces_frames() {
        let mut radar = mounted();
        radar.mount(now() + TimeDelta::minutes(10)).unwrap();
        assert_eq!(radar.surface().len(), 13);
        assert_eq!(radar.surface().times().last(), Some(&"2024-01-15T18:30:00Z"));
        assert_eq!(visible(&radar), vec![12]);
    }

    /// Surface that rejects every overlay past the first `limit`.
    struct FullSurface {
        inner: MemorySurface,
        limit: usize,
    }

    impl MapSurface for FullSurface {
        fn add_overlay(&mut self, overlay: &OverlaySpec) -> Result<LayerId> {
            anyhow::ensure!(self.inner.len() < self.limit, "layer limit reached");
            self.inner.add_overlay(overlay)
        }

        fn set_opacity(&mut self, layer: LayerId, opacity: f64) -> Result<()> {
            self.inner.set_opacity(layer, opacity)
        }

        fn remove_layer(&mut self, layer: LayerId) -> Result<()> {
            self.inner.remove_layer(layer)
        }
    }

    #[test]
    fn failed_mount_removes_partial_frames() {
        let surface = FullSurface { inner: MemorySurface::new(), limit: 5 };
        let mut radar = RadarScheduler::new(surface, WmsSource::default(), FrameSettings::default());

        let err = radar.mount(now()).unwrap_err();
        assert!(format!("{err:#}").contains("frame 6 of 13"));
        assert!(radar.surface().inner.is_empty());
        assert!(!radar.is_mounted());
        assert_eq!(radar.current(), None);

        radar.surface_mut().limit = 13;
        radar.mount(now()).unwrap();
        assert_eq!(radar.surface().inner.visible().len(), 1);
        assert_eq!(radar.current(), Some(12));
    }

    #[test]
    fn teardown_removes_everything() {
        let mut radar = mounted();
        radar.play().unwrap();
        radar.teardown().unwrap();
        assert!(radar.surface().is_empty());
        assert!(!radar.is_mounted());
        assert_eq!(radar.current(), None);
        assert_eq!(radar.tick().unwrap(), None);
    }
}
