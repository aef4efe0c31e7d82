/*
 * Application Module
 *
 * This module defines the viewer's model and its per-frame update.
 * The viewer is a thin host around the simulation core: it owns a Flock and
 * a FlockConfig, feeds slider changes into the config between frames, and
 * advances the flock exactly one tick per frame.
 */

use nannou::prelude::*;
use nannou_egui::Egui;
use tracing::{info, warn};

use crate::input;
use crate::metrics::DistanceSample;
use crate::params::FlockConfig;
use crate::renderer;
use crate::ui;
use crate::{Flock, SpawnBounds, TickReport};

// Distance metrics are O(n²); only sample them this often
const METRICS_INTERVAL: u64 = 30;

// Viewer-only switches that the simulation never reads
pub struct ViewSettings {
    pub num_boids: usize,
    pub seed: Option<u64>,
    pub pause_simulation: bool,
    pub show_debug: bool,
    pub show_perception_radius: bool,
    pub show_separation_radius: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            num_boids: 50,
            seed: None,
            pause_simulation: false,
            show_debug: false,
            show_perception_radius: false,
            show_separation_radius: false,
        }
    }
}

// Main model for the application
pub struct Model {
    pub flock: Flock,
    pub config: FlockConfig,
    pub settings: ViewSettings,
    pub egui: Egui,
    pub fps: f32,
    pub last_report: Option<TickReport>,
    pub last_sample: Option<DistanceSample>,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let config = load_config();

    // Create the main window sized to the configured world
    let window_id = app
        .new_window()
        .title("Boid Flocking Simulation")
        .size(config.width as u32, config.height as u32)
        .view(renderer::view)
        .mouse_pressed(input::mouse_pressed)
        .resized(input::resized)
        .raw_event(input::raw_window_event)
        .build()
        .expect("failed to build the viewer window");

    let window = app
        .window(window_id)
        .expect("viewer window vanished right after creation");
    let egui = Egui::from_window(&window);

    let settings = ViewSettings::default();
    let flock = Flock::create(settings.num_boids, SpawnBounds::world(&config), settings.seed);

    Model {
        flock,
        config,
        settings,
        egui,
        fps: 0.0,
        last_report: None,
        last_sample: None,
    }
}

// Optional first argument: path to a JSON FlockConfig
fn load_config() -> FlockConfig {
    let Some(path) = std::env::args().nth(1) else {
        return FlockConfig::default();
    };

    match FlockConfig::load(&path) {
        Ok(config) => {
            info!(%path, "loaded flock configuration");
            config
        }
        Err(err) => {
            warn!(%path, %err, "falling back to default flock configuration");
            FlockConfig::default()
        }
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.fps = app.fps();
    model.egui.set_elapsed_time(update.since_start);

    let should_reset = ui::update_ui(
        &mut model.egui,
        &mut model.config,
        &mut model.settings,
        model.flock.len(),
        model.last_sample.as_ref(),
        model.fps,
    );

    if should_reset {
        reset_flock(model);
    }

    if model.settings.pause_simulation || model.flock.is_empty() {
        return;
    }

    match model.flock.tick(&model.config) {
        Ok(report) => {
            model.last_report = Some(report);
            if report.tick % METRICS_INTERVAL == 0 {
                model.last_sample = DistanceSample::from_flock(&model.flock);
            }
        }
        Err(err) => {
            // Keep the last good frame on screen and let the user fix the sliders
            warn!(%err, "skipping tick");
            model.settings.pause_simulation = true;
        }
    }
}

// Replace the flock with a freshly randomised one
pub fn reset_flock(model: &mut Model) {
    model.flock = Flock::create(
        model.settings.num_boids,
        SpawnBounds::world(&model.config),
        model.settings.seed,
    );
    model.last_report = None;
    model.last_sample = None;
}
