//! Interactive viewer: paints the simulation and turns input into state
//! mutations.
//!
//! Clicks place the explorer and W/A/S/D move it, both only in explorer view.
//! The command panel accepts the textual spawn syntax.

use driftlab_core::{
    Color, Direction, DisplayList, DrawCommand, RenderLoop, SimError, Simulation,
    SimulationConfig, Spawn, ViewMode, ViewTransform,
};
use eframe::egui;
use glam::DVec2;

const DIRECTION_KEYS: [(egui::Key, Direction); 4] = [
    (egui::Key::W, Direction::Up),
    (egui::Key::A, Direction::Left),
    (egui::Key::S, Direction::Down),
    (egui::Key::D, Direction::Right),
];

pub struct ViewerApp {
    simulation: Simulation,
    render_loop: Option<RenderLoop>,
    command_text: String,
    last_spawn_error: Option<String>,
    frame: DisplayList,
}

impl ViewerApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: SimulationConfig,
        view_mode: ViewMode,
        spawns: &[Spawn],
    ) -> Result<Self, SimError> {
        let egui_ctx = cc.egui_ctx.clone();
        let simulation = Simulation::with_redraw(config, move || egui_ctx.request_repaint());
        simulation.set_view_mode(view_mode);
        for spawn in spawns {
            simulation.spawn(spawn)?;
        }

        let render_loop = RenderLoop::spawn(simulation.clone())?;

        Ok(Self {
            simulation,
            render_loop: Some(render_loop),
            command_text: String::new(),
            last_spawn_error: None,
            frame: DisplayList::new(),
        })
    }

    fn submit_command(&mut self) {
        let result = self
            .command_text
            .parse::<Spawn>()
            .map_err(|e| e.to_string())
            .and_then(|spawn| self.simulation.spawn(&spawn).map_err(|e| e.to_string()));

        match result {
            Ok(_) => {
                self.command_text.clear();
                self.last_spawn_error = None;
            }
            Err(e) => self.last_spawn_error = Some(e),
        }
    }

    fn handle_canvas_input(&self, ctx: &egui::Context, response: &egui::Response) {
        if !self.simulation.view_mode().is_explorer() {
            return;
        }

        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                // Canvas coordinates, used verbatim even while zoomed
                let local = pointer - response.rect.min;
                self.simulation.set_explorer(f64::from(local.x), f64::from(local.y));
            }
        }

        // Typing in the command panel must not steer the explorer
        if ctx.wants_keyboard_input() {
            return;
        }
        let moves: Vec<Direction> = ctx.input(|input| {
            DIRECTION_KEYS
                .iter()
                .filter(|(key, _)| input.key_pressed(*key))
                .map(|(_, direction)| *direction)
                .collect()
        });
        for direction in moves {
            self.simulation.move_explorer(direction);
        }
    }

    fn current_fps(&self) -> u32 {
        self.render_loop.as_ref().map_or(0, RenderLoop::current_fps)
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top bar with controls
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mut explorer_view = self.simulation.view_mode().is_explorer();
                if ui.checkbox(&mut explorer_view, "Explorer view").changed() {
                    self.simulation.set_view_mode(ViewMode::from(explorer_view));
                }

                ui.separator();

                ui.label("Spawn:");
                let edit = ui.add(
                    egui::TextEdit::singleline(&mut self.command_text)
                        .hint_text("line 5 100 100 500 100 0 10")
                        .desired_width(320.0),
                );
                let entered = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Add").clicked() || entered {
                    self.submit_command();
                }

                ui.separator();

                ui.label(format!("Particles: {}", self.simulation.particle_count()));
            });

            if let Some(ref error) = self.last_spawn_error {
                ui.label(
                    egui::RichText::new(format!("Error: {}", error)).color(egui::Color32::RED),
                );
            }
        });

        // Simulation canvas
        egui::CentralPanel::default().show(ctx, |ui| {
            let size = {
                let config = self.simulation.config();
                egui::vec2(config.width as f32, config.height as f32)
            };
            let (response, painter) = ui.allocate_painter(size, egui::Sense::click());
            self.handle_canvas_input(ctx, &response);

            // Record under the lock, paint after it is released
            let fps = self.current_fps();
            self.frame.clear();
            self.simulation.render_frame(&mut self.frame, fps);
            paint(&painter, response.rect, &self.frame);
        });
    }
}

impl Drop for ViewerApp {
    fn drop(&mut self) {
        if let Some(render_loop) = self.render_loop.take() {
            match render_loop.shutdown() {
                Ok(ticks) => log::info!("viewer closed after {} ticks", ticks),
                Err(e) => log::error!("viewer closed: {}", e),
            }
        }
    }
}

/// Paint a recorded frame into `rect`
fn paint(painter: &egui::Painter, rect: egui::Rect, frame: &DisplayList) {
    let mut transform: Option<ViewTransform> = None;

    let to_screen = |transform: &Option<ViewTransform>, point: DVec2| {
        let point = transform.map_or(point, |t| t.apply(point));
        rect.min + egui::vec2(point.x as f32, point.y as f32)
    };
    let scale = |transform: &Option<ViewTransform>| transform.map_or(1.0, |t| t.scale()) as f32;

    for command in frame.commands() {
        match command {
            DrawCommand::Clear(color) => {
                painter.rect_filled(rect, 0.0, color32(*color));
            }
            DrawCommand::SetTransform(next) => transform = *next,
            DrawCommand::FillRect { min, max, color } => {
                let area = egui::Rect::from_two_pos(
                    to_screen(&transform, *min),
                    to_screen(&transform, *max),
                );
                painter.rect_filled(area, 0.0, color32(*color));
            }
            DrawCommand::Disc {
                center,
                radius,
                color,
            } => {
                painter.circle_filled(
                    to_screen(&transform, *center),
                    *radius as f32 * scale(&transform),
                    color32(*color),
                );
            }
            DrawCommand::Text { pos, text, color } => {
                painter.text(
                    rect.min + egui::vec2(pos.x as f32, pos.y as f32),
                    egui::Align2::LEFT_BOTTOM,
                    text,
                    egui::FontId::proportional(12.0),
                    color32(*color),
                );
            }
        }
    }
}

fn color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}
