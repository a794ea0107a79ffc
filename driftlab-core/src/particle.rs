use crate::render::{Canvas, Color, DrawCommand};
use glam::DVec2;

/// Radius of the disc drawn for every particle
pub const PARTICLE_RADIUS: f64 = 3.0;

/// A point mass drifting in a straight line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: DVec2,
    pub velocity: f64,
    /// Heading in radians, never normalized
    pub heading: f64,
}

impl Particle {
    pub fn new(x: f64, y: f64, heading: f64, velocity: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
            velocity,
            heading,
        }
    }

    /// Unit vector along the heading
    pub fn direction(&self) -> DVec2 {
        DVec2::new(self.heading.cos(), self.heading.sin())
    }

    /// Move along the heading for `dt` time units.
    ///
    /// Non-finite inputs are not guarded and propagate into the position.
    pub fn advance(&mut self, dt: f64) {
        self.pos += dt * self.velocity * self.direction();
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.draw(DrawCommand::Disc {
            center: self.pos,
            radius: PARTICLE_RADIUS,
            color: Color::PARTICLE,
        });
    }
}
