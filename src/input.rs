/*
 * Input Module
 *
 * This module handles window events for the viewer:
 * - Right click spawns a boid at the cursor with a random heading
 * - Resizing the window resizes the simulated world
 * - Raw events are forwarded to egui
 */

use nannou::prelude::*;
use nannou::winit::event::MouseButton;
use tracing::debug;

use crate::app::Model;

// Mouse pressed event handler
pub fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Right || model.egui.ctx().is_pointer_over_area() {
        return;
    }

    let window_rect = app.window_rect();
    let position = ::glam::Vec2::new(
        app.mouse.x - window_rect.left(),
        app.mouse.y - window_rect.bottom(),
    );
    model.flock.spawn(position, None);
}

// Keep the world the same size as the window
pub fn resized(_app: &App, model: &mut Model, size: Vec2) {
    if size.x <= 0.0 || size.y <= 0.0 {
        return; // minimised
    }
    model.config.width = size.x;
    model.config.height = size.y;
    debug!(width = size.x, height = size.y, "world resized");
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
