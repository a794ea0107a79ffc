//! Draw commands and the canvas they are emitted into.
//!
//! Rendering a frame never paints directly: the state is traversed under the
//! simulation lock and recorded as [`DrawCommand`]s, which the presentation
//! surface paints after the lock is released.

use crate::config::SimulationConfig;
use crate::explorer::ViewTransform;
use crate::state::{SimulationState, ViewMode};
use glam::DVec2;

/// Baseline position of the FPS overlay, in canvas coordinates
pub const FPS_TEXT_POS: DVec2 = DVec2::new(10.0, 20.0);

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const PARTICLE: Color = Color::rgb(30, 90, 200);
    pub const EXPLORER: Color = Color::rgb(220, 40, 40);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A single drawing instruction.
///
/// Positions are in world coordinates and go through the active transform,
/// except `Clear` and `Text` which are in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    /// Replace the active world-to-canvas transform (`None` = identity)
    SetTransform(Option<ViewTransform>),
    FillRect {
        min: DVec2,
        max: DVec2,
        color: Color,
    },
    Disc {
        center: DVec2,
        radius: f64,
        color: Color,
    },
    Text {
        pos: DVec2,
        text: String,
        color: Color,
    },
}

/// Sink for draw commands
pub trait Canvas {
    fn draw(&mut self, command: DrawCommand);
}

/// A recorded frame
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Discs drawn with the given color, in draw order
    pub fn discs(&self, color: Color) -> impl Iterator<Item = (DVec2, f64)> + '_ {
        self.commands.iter().filter_map(move |command| match command {
            DrawCommand::Disc {
                center,
                radius,
                color: c,
            } if *c == color => Some((*center, *radius)),
            _ => None,
        })
    }
}

impl Canvas for DisplayList {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

/// Emit one frame of `state` into `canvas`. Read-only.
pub(crate) fn render_state(
    state: &SimulationState,
    config: &SimulationConfig,
    fps: u32,
    canvas: &mut impl Canvas,
) {
    match (state.view_mode(), state.explorer()) {
        (ViewMode::Explorer, Some(explorer)) => {
            canvas.draw(DrawCommand::Clear(Color::BLACK));
            canvas.draw(DrawCommand::SetTransform(Some(explorer.view_transform(config))));
            canvas.draw(DrawCommand::FillRect {
                min: DVec2::ZERO,
                max: config.bounds(),
                color: Color::WHITE,
            });
            for particle in state.particles() {
                particle.draw(canvas);
            }
            explorer.draw(canvas, config);
            canvas.draw(DrawCommand::SetTransform(None));
        }
        _ => {
            canvas.draw(DrawCommand::Clear(Color::WHITE));
            for particle in state.particles() {
                particle.draw(canvas);
            }
            if let Some(explorer) = state.explorer() {
                explorer.draw(canvas, config);
            }
        }
    }

    canvas.draw(DrawCommand::Text {
        pos: FPS_TEXT_POS,
        text: format!("FPS: {}", fps),
        color: Color::GRAY,
    });
}
