pub mod config;
pub mod error;
pub mod explorer;
pub mod metrics;
pub mod particle;
pub mod render;
pub mod render_loop;
pub mod spawn;
pub mod state;

pub use config::SimulationConfig;
pub use error::{SimError, SpawnParseError};
pub use explorer::{Direction, Explorer, ViewTransform};
pub use metrics::{FpsGauge, FrameCounter};
pub use particle::Particle;
pub use render::{Canvas, Color, DisplayList, DrawCommand};
pub use render_loop::RenderLoop;
pub use spawn::{FanKind, Spawn, MAX_FAN_COUNT};
pub use state::{Simulation, SimulationState, ViewMode};
