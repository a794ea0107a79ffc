//! Fixed parameters of the simulated world and its update loop.

use glam::DVec2;
use std::time::Duration;

/// World size, loop cadence and explorer camera settings.
///
/// These are application constants rather than user settings; they are
/// carried in a value so the loop, the state and the renderer all agree on
/// them without global state.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Width of the simulation area
    pub width: f64,
    /// Height of the simulation area
    pub height: f64,
    /// Pause between two update ticks (best effort)
    pub tick_interval: Duration,
    /// Time step applied to every particle on each tick.
    /// Fixed, not measured from wall-clock time.
    pub dt: f64,
    /// Minimum wall-clock window over which FPS is sampled
    pub fps_window: Duration,
    /// Radius of the explorer marker, also its margin to the bounds
    pub explorer_radius: f64,
    /// Distance covered by one directional explorer move
    pub explorer_step: f64,
    /// Magnification used by the explorer view
    pub zoom: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            tick_interval: Duration::from_millis(10),
            dt: 0.1,
            fps_window: Duration::from_millis(500),
            explorer_radius: 10.0,
            explorer_step: 5.0,
            zoom: 1.94,
        }
    }
}

impl SimulationConfig {
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Lower-right corner of the world rectangle
    pub fn bounds(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    pub fn center(&self) -> DVec2 {
        self.bounds() * 0.5
    }
}
