/*
 * Boid Flocking Simulation
 *
 * Interactive viewer for the flocking core. Boids follow three rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 *
 * Usage: boids [config.json]
 * Set RUST_LOG=flocking=debug to see simulation logs.
 */

use flocking::app;

fn main() {
    init_tracing();
    nannou::app(app::model).update(app::update).run();
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
