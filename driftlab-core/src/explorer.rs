//! The explorer: a user-placed camera anchor and the zoomed view around it.

use crate::config::SimulationConfig;
use crate::render::{Canvas, Color, DrawCommand};
use glam::{DAffine2, DVec2};

/// Directional explorer moves, in screen orientation (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Camera anchor point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explorer {
    pub pos: DVec2,
}

impl Explorer {
    /// Place an explorer at the given position, unclamped
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
        }
    }

    /// Move one step in `direction`, keeping the moved coordinate within
    /// `[radius, bound - radius]`.
    pub fn step(&mut self, direction: Direction, config: &SimulationConfig) {
        let step = config.explorer_step;
        let (x, y) = (self.pos.x, self.pos.y);
        match direction {
            Direction::Up => self.pos.y = clamp_to_margin(y - step, config.height, config),
            Direction::Down => self.pos.y = clamp_to_margin(y + step, config.height, config),
            Direction::Left => self.pos.x = clamp_to_margin(x - step, config.width, config),
            Direction::Right => self.pos.x = clamp_to_margin(x + step, config.width, config),
        }
    }

    /// Camera that keeps this explorer at the canvas center, magnified
    pub fn view_transform(&self, config: &SimulationConfig) -> ViewTransform {
        ViewTransform::centered_on(self.pos, config.center(), config.zoom)
    }

    pub fn draw(&self, canvas: &mut impl Canvas, config: &SimulationConfig) {
        canvas.draw(DrawCommand::Disc {
            center: self.pos,
            radius: config.explorer_radius,
            color: Color::EXPLORER,
        });
    }
}

fn clamp_to_margin(value: f64, bound: f64, config: &SimulationConfig) -> f64 {
    let radius = config.explorer_radius;
    // f64::clamp panics if the world is narrower than the marker
    value.max(radius).min(bound - radius)
}

/// World-to-canvas transform of the explorer view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    affine: DAffine2,
    zoom: f64,
}

impl ViewTransform {
    /// translate(center) * scale(zoom) * translate(-focus)
    pub fn centered_on(focus: DVec2, center: DVec2, zoom: f64) -> Self {
        let affine = DAffine2::from_translation(center)
            * DAffine2::from_scale(DVec2::splat(zoom))
            * DAffine2::from_translation(-focus);
        Self { affine, zoom }
    }

    pub fn apply(&self, point: DVec2) -> DVec2 {
        self.affine.transform_point2(point)
    }

    /// Uniform scale factor, used for radii and stroke widths
    pub fn scale(&self) -> f64 {
        self.zoom
    }
}
