/*
 * UI Module
 *
 * This module builds the egui control panel. Sliders write straight into the
 * FlockConfig, which the flock reads on the next tick.
 */

use nannou_egui::{egui, Egui};

use crate::app::ViewSettings;
use crate::metrics::DistanceSample;
use crate::params::{BoundaryMode, FlockConfig, NeighborSearch};

// Update the UI and return whether the flock should be reset
pub fn update_ui(
    egui: &mut Egui,
    config: &mut FlockConfig,
    settings: &mut ViewSettings,
    boid_count: usize,
    sample: Option<&DistanceSample>,
    fps: f32,
) -> bool {
    let mut should_reset = false;
    let radius_range = config.radius_range();

    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Boid Parameters", |ui| {
                ui.add(egui::Slider::new(&mut settings.num_boids, 1..=1000).text("Number of Boids"));
                if ui.button("Reset Boids").clicked() {
                    should_reset = true;
                }
                ui.label("Right click to spawn a boid");

                ui.add(egui::Slider::new(&mut config.max_speed, FlockConfig::max_speed_range()).text("Max Speed"));
                ui.add(egui::Slider::new(&mut config.max_force, FlockConfig::max_force_range()).text("Max Force"));
            });

            ui.collapsing("Flocking Behavior", |ui| {
                ui.add(egui::Slider::new(&mut config.alignment_weight, FlockConfig::weight_range()).text("Alignment Weight"));
                ui.add(egui::Slider::new(&mut config.cohesion_weight, FlockConfig::weight_range()).text("Cohesion Weight"));
                ui.add(egui::Slider::new(&mut config.separation_weight, FlockConfig::weight_range()).text("Separation Weight"));
                ui.add(egui::Slider::new(&mut config.perception_radius, radius_range.clone()).text("Perception Radius"));
                ui.add(egui::Slider::new(&mut config.separation_radius, radius_range).text("Separation Radius"));
            });

            ui.collapsing("Boundary", |ui| {
                ui.radio_value(&mut config.boundary, BoundaryMode::Wraparound, "Wraparound");
                ui.radio_value(&mut config.boundary, BoundaryMode::SoftConfine, "Soft confine");
            });

            ui.collapsing("Performance Tuning", |ui| {
                ui.checkbox(&mut config.parallel, "Enable Parallel Processing");
                ui.radio_value(&mut config.neighbor_search, NeighborSearch::BruteForce, "Brute force");
                ui.radio_value(&mut config.neighbor_search, NeighborSearch::Grid, "Spatial grid");

                ui.separator();

                ui.label(format!("FPS: {:.1}", fps));
                ui.label(format!("Total Boids: {}", boid_count));
                if let Some(sample) = sample {
                    ui.label(format!(
                        "Nearest: min {:.1} / avg {:.1} / max {:.1}",
                        sample.nearest.min, sample.nearest.avg, sample.nearest.max
                    ));
                    ui.label(format!(
                        "Farthest: min {:.1} / avg {:.1} / max {:.1}",
                        sample.farthest.min, sample.farthest.avg, sample.farthest.max
                    ));
                }
            });

            ui.checkbox(&mut settings.show_perception_radius, "Show perception radius");
            ui.checkbox(&mut settings.show_separation_radius, "Show separation radius");
            ui.checkbox(&mut settings.show_debug, "Show Debug Info");
            ui.checkbox(&mut settings.pause_simulation, "Pause Simulation");
        });

    should_reset
}
