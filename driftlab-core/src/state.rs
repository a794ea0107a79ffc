//! Shared simulation state and the handle that owns its lock.

use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::explorer::{Direction, Explorer};
use crate::particle::Particle;
use crate::render::{render_state, Canvas};
use crate::spawn::Spawn;
use glam::DVec2;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// How the state is presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Whole world, unzoomed
    #[default]
    Normal,
    /// Zoomed camera centered on the explorer
    Explorer,
}

impl ViewMode {
    pub fn is_explorer(self) -> bool {
        self == ViewMode::Explorer
    }
}

impl From<bool> for ViewMode {
    fn from(explorer_view: bool) -> Self {
        if explorer_view {
            ViewMode::Explorer
        } else {
            ViewMode::Normal
        }
    }
}

/// Particles in insertion order, the optional explorer and the view mode
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    particles: Vec<Particle>,
    explorer: Option<Explorer>,
    view_mode: ViewMode,
}

impl SimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn explorer(&self) -> Option<&Explorer> {
        self.explorer.as_ref()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn add_particle(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn extend(&mut self, particles: impl IntoIterator<Item = Particle>) {
        self.particles.extend(particles);
    }

    /// Advance every particle by `dt`, in insertion order
    pub fn advance(&mut self, dt: f64) {
        for particle in &mut self.particles {
            particle.advance(dt);
        }
    }

    /// Install a new explorer, returning the one it replaces
    pub fn replace_explorer(&mut self, explorer: Explorer) -> Option<Explorer> {
        self.explorer.replace(explorer)
    }

    /// Returns `false` when there is no explorer to move
    pub fn move_explorer(&mut self, direction: Direction, config: &SimulationConfig) -> bool {
        match self.explorer.as_mut() {
            Some(explorer) => {
                explorer.step(direction, config);
                true
            }
            None => false,
        }
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }
}

/// Callback asking the presentation surface to repaint. Must not block.
pub type RedrawHook = Arc<dyn Fn() + Send + Sync>;

struct Shared {
    state: Mutex<SimulationState>,
    config: SimulationConfig,
    redraw: Option<RedrawHook>,
}

/// Cloneable handle to the shared simulation.
///
/// Every read traversal and every mutation holds the same lock for its whole
/// duration. The redraw hook is always invoked after the lock is released.
#[derive(Clone)]
pub struct Simulation {
    shared: Arc<Shared>,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        Self::build(config, None)
    }

    /// Create a simulation that calls `redraw` after each tick and each
    /// explorer placement
    pub fn with_redraw(
        config: SimulationConfig,
        redraw: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self::build(config, Some(Arc::new(redraw)))
    }

    fn build(config: SimulationConfig, redraw: Option<RedrawHook>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SimulationState::new()),
                config,
                redraw,
            }),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.shared.config
    }

    // Poisoning is ignored: no mutation can stop half-way through.
    fn lock(&self) -> MutexGuard<'_, SimulationState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn request_redraw(&self) {
        if let Some(redraw) = &self.shared.redraw {
            redraw();
        }
    }

    pub fn add_particle(&self, x: f64, y: f64, heading: f64, velocity: f64) {
        self.lock().add_particle(Particle::new(x, y, heading, velocity));
    }

    pub fn add_linear_fan(
        &self,
        count: usize,
        from: DVec2,
        to: DVec2,
        heading: f64,
        velocity: f64,
    ) -> Result<usize, SimError> {
        self.spawn(&Spawn::LinearFan {
            count,
            from,
            to,
            heading,
            velocity,
        })
    }

    pub fn add_angular_fan(
        &self,
        count: usize,
        at: DVec2,
        from_heading: f64,
        to_heading: f64,
        velocity: f64,
    ) -> Result<usize, SimError> {
        self.spawn(&Spawn::AngularFan {
            count,
            at,
            from_heading,
            to_heading,
            velocity,
        })
    }

    pub fn add_velocity_fan(
        &self,
        count: usize,
        at: DVec2,
        heading: f64,
        from_velocity: f64,
        to_velocity: f64,
    ) -> Result<usize, SimError> {
        self.spawn(&Spawn::VelocityFan {
            count,
            at,
            heading,
            from_velocity,
            to_velocity,
        })
    }

    /// Add the particles of `spawn` under one lock acquisition, so a fan is
    /// contiguous in the sequence. Nothing is added on error.
    pub fn spawn(&self, spawn: &Spawn) -> Result<usize, SimError> {
        let particles = spawn.particles()?;
        let added = particles.len();
        self.lock().extend(particles);
        log::debug!("spawned {} particle(s): {}", added, spawn);
        Ok(added)
    }

    /// Replace the explorer with a new one at (x, y), returning the old one
    pub fn set_explorer(&self, x: f64, y: f64) -> Option<Explorer> {
        let previous = self.lock().replace_explorer(Explorer::new(x, y));
        log::debug!("explorer placed at ({}, {})", x, y);
        self.request_redraw();
        previous
    }

    pub fn move_explorer(&self, direction: Direction) -> bool {
        self.lock().move_explorer(direction, &self.shared.config)
    }

    pub fn set_view_mode(&self, view_mode: ViewMode) {
        self.lock().set_view_mode(view_mode);
    }

    pub fn view_mode(&self) -> ViewMode {
        self.lock().view_mode()
    }

    pub fn explorer(&self) -> Option<Explorer> {
        self.lock().explorer().copied()
    }

    pub fn particle_count(&self) -> usize {
        self.lock().particles().len()
    }

    /// One update tick: advance all particles by the configured dt, then
    /// request a redraw
    pub fn tick(&self) {
        self.lock().advance(self.shared.config.dt);
        self.request_redraw();
    }

    /// Record one frame into `canvas` while holding the lock
    pub fn render_frame(&self, canvas: &mut impl Canvas, fps: u32) {
        let state = self.lock();
        render_state(&state, &self.shared.config, fps, canvas);
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> SimulationState {
        self.lock().clone()
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("config", &self.shared.config)
            .field("state", &*self.lock())
            .finish()
    }
}
