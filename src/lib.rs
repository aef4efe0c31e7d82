/*
 * Boid Flocking Simulation - Module Definitions
 *
 * This file defines the module structure of the flocking crate.
 * The simulation core (boid, steering, flock, params) has no graphics
 * dependency; the interactive viewer modules are only built with the
 * `viewer` feature.
 */

// Re-export key components for easier access
pub use boid::{Boid, BoidState};
pub use error::ConfigError;
pub use flock::{Flock, SpawnBounds, TickReport};
pub use metrics::{DistanceSample, MetricsRecorder};
pub use params::{BoundaryMode, FlockConfig, NeighborSearch};
pub use spatial_grid::SpatialGrid;
pub use steering::{CrispSteering, Neighborhood, Steering, SteeringStrategy};

// Define modules
pub mod boid;
pub mod error;
pub mod flock;
pub mod metrics;
pub mod params;
pub mod spatial_grid;
pub mod steering;
pub mod vector;

#[cfg(feature = "viewer")]
pub mod app;
#[cfg(feature = "viewer")]
pub mod input;
#[cfg(feature = "viewer")]
pub mod renderer;
#[cfg(feature = "viewer")]
pub mod ui;

// Constants
pub const BOID_SIZE: f32 = 6.0;
/// Boids disappear fully past the edge before wrapping around.
pub const WRAP_MARGIN: f32 = BOID_SIZE / 2.0;
/// Soft confinement starts this fraction of the smaller world side from each edge.
pub const HOME_BORDER_FRACTION: f32 = 0.1;
/// Speed given to randomly created and spawned boids.
pub const INITIAL_SPEED: f32 = 2.0;
