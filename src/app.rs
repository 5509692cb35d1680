/*
 * Application Module
 *
 * This module hosts the flock in a nannou window. nannou provides the three
 * collaborators the simulation needs:
 * - Frame clock: every `update` advances the world by one tick
 * - Viewport: the window size is the world size, a resize re-seeds
 * - Render surface: `view` draws the current flock
 *
 * A window shrunk to nothing (minimized on most platforms) pauses the
 * simulation; any non-zero size resumes it without replaying missed ticks.
 */

use clap::Parser;
use nannou::prelude::*;
use tracing::{error, info, warn};

use crate::cli::Cli;
use crate::debug::DebugInfo;
use crate::error::Result;
use crate::flock::World;
use crate::params::SimulationParams;
use crate::physics;
use crate::renderer::{self, Palette};

const WINDOW_TITLE: &str = "Flock Background";
const INITIAL_WIDTH: u32 = 1280;
const INITIAL_HEIGHT: u32 = 800;

// Main model for the application
pub struct Model {
    pub world: World,
    pub palette: Palette,
    pub debug_info: DebugInfo,
}

impl Model {
    /// Validate everything that can fail before a window exists.
    pub fn prepare(params: SimulationParams, seed: Option<u64>) -> Result<Self> {
        let palette = Palette::from_params(&params)?;
        let (width, height) = (INITIAL_WIDTH as f32, INITIAL_HEIGHT as f32);
        let world = match seed {
            Some(seed) => World::with_seed(params, width, height, seed)?,
            None => World::new(params, width, height)?,
        };

        Ok(Self {
            world,
            palette,
            debug_info: DebugInfo::default(),
        })
    }

    // Track the window: zero area pauses, any other size re-seeds at that size
    pub fn handle_resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            self.world.pause();
            return;
        }
        self.world.resume();

        let bounds = self.world.bounds();
        if bounds.width == width && bounds.height == height {
            return;
        }
        if let Err(err) = self.world.resize(width, height) {
            warn!(%err, "ignoring window resize");
        }
    }

    pub fn tick(&mut self, time_ms: f64) {
        physics::step(&mut self.world, time_ms);
        if self.world.params().show_debug {
            self.debug_info.observe(&self.world);
        }
    }
}

/// Open the window and run until it is closed.
pub fn run() {
    nannou::app(model).update(update).run();
}

// Builds the whole flock from the command line, like a standalone sketch
fn model(app: &App) -> Model {
    let cli = Cli::parse();
    let mut model = match cli.load_params().and_then(|params| Model::prepare(params, cli.seed)) {
        Ok(model) => model,
        Err(err) => {
            error!(%err, "failed to prepare flock");
            std::process::exit(1);
        }
    };
    info!(
        boids = model.world.boids.len(),
        groups = model.world.params().num_groups(),
        "starting flock"
    );

    app.new_window()
        .title(WINDOW_TITLE)
        .size(INITIAL_WIDTH, INITIAL_HEIGHT)
        .view(view)
        .resized(resized)
        .build()
        .unwrap();

    let rect = app.window_rect();
    model.handle_resize(rect.w(), rect.h());
    model
}

fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.record_frame(app.fps(), update.since_last);
    model.tick(update.since_start.as_secs_f64() * 1000.0);
}

fn resized(_app: &App, model: &mut Model, size: Vec2) {
    model.handle_resize(size.x, size.y);
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();

    renderer::draw_world(&draw, &model.world, &model.palette);

    if model.world.params().show_debug {
        renderer::draw_perception(&draw, &model.world);
        model.debug_info.draw(&draw, app.window_rect());
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        warn!(?err, "failed to draw frame");
    }
}
