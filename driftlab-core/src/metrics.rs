//! Frame-rate accounting for the render loop.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Counts ticks and turns them into an FPS sample once per window.
///
/// Owned by the loop thread; the result is published through an [`FpsGauge`].
#[derive(Debug, Clone)]
pub struct FrameCounter {
    frames: u32,
    last_check: Instant,
    window: Duration,
}

impl FrameCounter {
    pub fn new(start: Instant, window: Duration) -> Self {
        Self {
            frames: 0,
            last_check: start,
            window,
        }
    }

    pub fn record_tick(&mut self) {
        self.frames = self.frames.saturating_add(1);
    }

    /// Once at least one window has elapsed since the last sample, compute
    /// `frames / elapsed_seconds` (truncated) and reset counter and timer.
    pub fn sample(&mut self, now: Instant) -> Option<u32> {
        let elapsed = now.saturating_duration_since(self.last_check);
        if elapsed < self.window || elapsed.is_zero() {
            return None;
        }

        let fps = (f64::from(self.frames) / elapsed.as_secs_f64()) as u32;
        self.frames = 0;
        self.last_check = now;
        Some(fps)
    }
}

/// Last published FPS value, shared between the loop and the presentation
#[derive(Debug, Clone, Default)]
pub struct FpsGauge(Arc<AtomicU32>);

impl FpsGauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, fps: u32) {
        self.0.store(fps, Ordering::Relaxed);
    }

    pub fn current(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }
}
