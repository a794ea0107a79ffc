use clap::{Parser, Subcommand};
use driftlab_core::{Simulation, SimulationConfig, Spawn, ViewMode};

mod viewer;

use viewer::ViewerApp;

#[derive(Parser)]
#[command(name = "driftlab")]
#[command(about = "driftlab - straight-line particle drift with an explorer camera", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive viewer
    View {
        /// Start in explorer view
        #[arg(long)]
        explorer: bool,
        /// Spawn command run at start-up, e.g. "line 5 100 100 500 100 0 10" (repeatable)
        #[arg(long = "spawn", value_name = "COMMAND")]
        spawns: Vec<Spawn>,
    },
    /// Advance the simulation without a window and print the final particles
    Run {
        /// Number of fixed-step ticks
        #[arg(long, default_value_t = 100)]
        ticks: u64,
        /// Spawn command (repeatable)
        #[arg(long = "spawn", value_name = "COMMAND", required = true)]
        spawns: Vec<Spawn>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::View { explorer, spawns } => run_viewer(ViewMode::from(explorer), spawns),
        Commands::Run { ticks, spawns } => run_headless(ticks, &spawns),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_viewer(view_mode: ViewMode, spawns: Vec<Spawn>) -> Result<(), Box<dyn std::error::Error>> {
    let config = SimulationConfig::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("driftlab")
            .with_inner_size([config.width as f32 + 16.0, config.height as f32 + 64.0]),
        ..Default::default()
    };

    eframe::run_native(
        "driftlab",
        options,
        Box::new(move |cc| {
            let app = ViewerApp::new(cc, config, view_mode, &spawns)?;
            Ok(Box::new(app))
        }),
    )?;

    Ok(())
}

fn run_headless(ticks: u64, spawns: &[Spawn]) -> Result<(), Box<dyn std::error::Error>> {
    let simulation = Simulation::new(SimulationConfig::default());
    for spawn in spawns {
        simulation.spawn(spawn)?;
    }

    log::info!(
        "running {} ticks over {} particle(s)",
        ticks,
        simulation.particle_count()
    );
    for _ in 0..ticks {
        simulation.tick();
    }

    // Print final particle states
    let state = simulation.snapshot();
    for (i, particle) in state.particles().iter().enumerate() {
        println!(
            "{} pos = ({:.6}, {:.6}) heading = {:.6} velocity = {:.6}",
            i, particle.pos.x, particle.pos.y, particle.heading, particle.velocity
        );
    }

    Ok(())
}
