// main.rs - Window host for the parallel toroidal Game of Life
// Drives life_engine once per frame and draws each generation as a texture

use clap::Parser;
use eframe::egui;
use egui::{Color32, TextureHandle};
use life_engine::config::{DEFAULT_ALIVE_PROBABILITY_PERCENT, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use life_engine::{LifeConfig, LifeInterface, Simulation};
use log::{error, info};

mod render;
mod ui;

const CONTROL_BAR_HEIGHT: f32 = 96.0;

/// Conway's Game of Life on a torus, every row computed in parallel.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Number of grid columns.
    #[arg(long, value_name = "COLUMNS", default_value_t = DEFAULT_WIDTH)]
    width: usize,
    /// Number of grid rows.
    #[arg(long, value_name = "ROWS", default_value_t = DEFAULT_HEIGHT)]
    height: usize,
    /// Chance, in percent, that each cell starts alive.
    #[arg(
        long,
        value_name = "PERCENT",
        default_value_t = DEFAULT_ALIVE_PROBABILITY_PERCENT,
        value_parser = clap::value_parser!(u32).range(0..=100)
    )]
    alive: u32,
    /// Seed for the starting population. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Generations per second.
    #[arg(
        long,
        value_name = "RATE",
        default_value_t = 60,
        value_parser = clap::value_parser!(u32).range(1..=1000)
    )]
    fps: u32,
    /// Worker threads for row tasks. One per CPU when omitted.
    #[arg(long)]
    threads: Option<usize>,
    /// Screen pixels per cell.
    #[arg(long, default_value_t = 2.0)]
    scale: f32,
}

impl CliArgs {
    fn to_config(&self) -> LifeConfig {
        let mut config = LifeConfig::new(self.width, self.height, self.alive).with_rate(self.fps);
        config.seed = self.seed;
        config.worker_threads = self.threads;
        config
    }
}

fn main() -> Result<(), eframe::Error> {
    env_logger::init();
    let args = CliArgs::parse();
    let config = args.to_config();

    let simulation = match Simulation::new(&config) {
        Ok(simulation) => simulation,
        Err(err) => {
            error!("cannot start simulation: {err}");
            std::process::exit(1);
        }
    };
    info!(
        "{}x{} torus, {}% alive, {} worker threads",
        config.width,
        config.height,
        config.alive_probability_percent,
        simulation.worker_threads()
    );

    let (width, height) = simulation.dimensions();
    let scale = args.scale.max(1.0);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([
            width as f32 * scale,
            height as f32 * scale + CONTROL_BAR_HEIGHT,
        ]),
        ..Default::default()
    };

    eframe::run_native(
        "Conway's game of life",
        options,
        Box::new(move |_cc| Box::new(LifeViewer::new(simulation, config.alive_probability_percent, scale))),
    )
}

/// Host state around the engine: run flag, colors, and the uploaded texture.
pub struct LifeViewer {
    pub simulation: Simulation,
    pub is_running: bool,
    pub pause_on_cycle: bool,
    pub alive_probability_percent: u32,
    pub scale: f32,
    pub live_color: Color32,
    pub dead_color: Color32,
    pub selected_pattern: usize,
    pub failure: Option<String>,
    texture: Option<TextureHandle>,
}

impl LifeViewer {
    fn new(simulation: Simulation, alive_probability_percent: u32, scale: f32) -> Self {
        Self {
            simulation,
            is_running: true,
            pause_on_cycle: false,
            alive_probability_percent,
            scale,
            live_color: Color32::WHITE,
            dead_color: Color32::BLACK,
            selected_pattern: 0,
            failure: None,
            texture: None,
        }
    }

    /// One host frame: let the engine advance if its gate allows.
    fn drive(&mut self) {
        if !self.is_running {
            return;
        }
        match self.simulation.update() {
            Ok(_) => {
                if let Some(period) = self.simulation.last_cycle().filter(|_| self.pause_on_cycle) {
                    info!("pausing on a cycle of period {period}");
                    self.is_running = false;
                }
            }
            Err(err) => {
                error!("{err}");
                self.failure = Some(err.to_string());
                self.is_running = false;
            }
        }
    }

    /// Uploads the current generation, reusing the texture when possible.
    fn refresh_texture(&mut self, ctx: &egui::Context) -> &TextureHandle {
        let image = render::grid_image(&self.simulation.snapshot(), self.live_color, self.dead_color);
        let texture = match self.texture.take() {
            Some(mut texture) if texture.size() == image.size => {
                texture.set(image, egui::TextureOptions::NEAREST);
                texture
            }
            _ => ctx.load_texture("generation", image, egui::TextureOptions::NEAREST),
        };
        self.texture.insert(texture)
    }
}
