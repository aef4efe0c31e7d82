/*
 * Renderer Module
 *
 * This module draws the flock. World coordinates run from (0, 0) to
 * (width, height); nannou puts the origin at the window centre, so every
 * position is shifted by half the world before drawing.
 */

use nannou::prelude::*;
use tracing::warn;

use crate::app::Model;
use crate::boid::Boid;
use crate::BOID_SIZE;

// Convert a world position to window coordinates
fn to_screen(position: ::glam::Vec2, window_rect: Rect) -> Point2 {
    pt2(
        position.x + window_rect.left(),
        position.y + window_rect.bottom(),
    )
}

// Draw a single boid as a triangle pointing along its velocity
fn draw_boid(draw: &Draw, boid: &Boid, window_rect: Rect) {
    let angle = boid.velocity.y.atan2(boid.velocity.x);
    let points = [
        pt2(BOID_SIZE, 0.0),
        pt2(-BOID_SIZE, BOID_SIZE / 2.0),
        pt2(-BOID_SIZE, -BOID_SIZE / 2.0),
    ];

    draw.polygon()
        .color(rgb(220u8, 220, 220))
        .points(points)
        .xy(to_screen(boid.position, window_rect))
        .rotate(angle);
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let window_rect = app.window_rect();

    for boid in model.flock.boids() {
        draw_boid(&draw, boid, window_rect);
    }

    if let Some(first) = model.flock.boids().first() {
        let centre = to_screen(first.position, window_rect);

        if model.settings.show_perception_radius {
            draw.ellipse()
                .xy(centre)
                .radius(model.config.perception_radius)
                .no_fill()
                .stroke(rgba(0.98, 0.02, 0.43, 0.4))
                .stroke_weight(1.0);
        }

        if model.settings.show_separation_radius {
            draw.ellipse()
                .xy(centre)
                .radius(model.config.separation_radius)
                .no_fill()
                .stroke(rgba(0.0, 0.98, 0.98, 0.4))
                .stroke_weight(1.0);
        }
    }

    if model.settings.show_debug {
        draw_debug_info(&draw, model, window_rect);
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        warn!(?err, "failed to draw frame");
    }
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        warn!(?err, "failed to draw controls");
    }
}

// Draw debug information in the top-left corner
fn draw_debug_info(draw: &Draw, model: &Model, window_rect: Rect) {
    let line_height = 20.0;
    let text_x = window_rect.left() + 100.0;
    let text_y = window_rect.top() - 20.0;

    let mut lines = vec![
        format!("FPS: {:.1}", model.fps),
        format!("Boids: {}", model.flock.len()),
        format!("Tick: {}", model.flock.tick_count()),
    ];
    if let Some(report) = &model.last_report {
        lines.push(format!("With neighbors: {}", report.agents_with_neighbors));
        lines.push(format!("Max force: {:.3}", report.max_applied_force));
    }

    for (i, text) in lines.iter().enumerate() {
        draw.text(text)
            .x_y(text_x, text_y - i as f32 * line_height)
            .color(WHITE)
            .font_size(14);
    }
}
