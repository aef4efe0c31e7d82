/*
 * Boid Module
 *
 * This module defines the Boid struct and its per-agent behavior:
 * force accumulation, integration, and boundary handling.
 * The neighbor rules (alignment, cohesion, separation) live in the
 * steering module and only ever see BoidState snapshots.
 */

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::params::{BoundaryMode, FlockConfig};
use crate::vector::limit;
use crate::INITIAL_SPEED;

/// The part of a boid that neighbors can observe during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoidState {
    pub position: Vec2,
    pub velocity: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
}

impl Boid {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec2::ZERO,
        }
    }

    // Create a boid at `position` heading in a random direction
    pub fn with_random_velocity<R: Rng + ?Sized>(position: Vec2, rng: &mut R) -> Self {
        Self::new(position, random_velocity(rng))
    }

    pub fn state(&self) -> BoidState {
        BoidState {
            position: self.position,
            velocity: self.velocity,
        }
    }

    /// Sum `forces` into the acceleration, then clamp it to `max_force`.
    pub fn apply_force(&mut self, forces: &[Vec2], max_force: f32) {
        let total = forces.iter().fold(self.acceleration, |acc, &force| acc + force);
        self.acceleration = limit(total, max_force);
    }

    /// Advance one step: velocity from acceleration, position from velocity.
    pub fn integrate(&mut self, max_speed: f32) {
        self.velocity = limit(self.velocity + self.acceleration, max_speed);
        self.position += self.velocity;
        self.acceleration = Vec2::ZERO;
    }

    /// One full step under `config`: the weighted steering forces and the
    /// boundary policy, a single clamp to `max_force`, then integration.
    ///
    /// Soft confinement adds its border force to the same sum as the
    /// steering; wraparound moves the position after integrating.
    /// Returns the magnitude of the acceleration that was integrated.
    pub fn advance(&mut self, steering: [Vec2; 3], config: &FlockConfig, margin: f32) -> f32 {
        match config.boundary {
            BoundaryMode::Wraparound => {
                self.apply_force(&steering, config.max_force);
                let applied = self.acceleration.length();
                self.integrate(config.max_speed);
                self.wrap_edges(config.width, config.height, margin);
                applied
            }
            BoundaryMode::SoftConfine => {
                let border = self.border_force(
                    config.width,
                    config.height,
                    config.home_border(),
                    config.max_speed,
                );
                let [alignment, cohesion, separation] = steering;
                self.apply_force(&[alignment, cohesion, separation, border], config.max_force);
                let applied = self.acceleration.length();
                self.integrate(config.max_speed);
                applied
            }
        }
    }

    // Teleport to the opposite edge once the boid is `margin` past a border
    pub fn wrap_edges(&mut self, width: f32, height: f32, margin: f32) {
        if self.position.x < -margin {
            self.position.x = width + margin;
        } else if self.position.x > width + margin {
            self.position.x = -margin;
        }

        if self.position.y < -margin {
            self.position.y = height + margin;
        } else if self.position.y > height + margin {
            self.position.y = -margin;
        }
    }

    // Unclamped force steering back towards the interior once inside the home border
    pub fn border_force(&self, width: f32, height: f32, home_border: f32, max_speed: f32) -> Vec2 {
        let mut steer = Vec2::ZERO;

        if self.position.x < home_border {
            steer.x = max_speed - self.velocity.x;
        } else if self.position.x > width - home_border {
            steer.x = -max_speed - self.velocity.x;
        }

        if self.position.y < home_border {
            steer.y = max_speed - self.velocity.y;
        } else if self.position.y > height - home_border {
            steer.y = -max_speed - self.velocity.y;
        }

        steer
    }
}

/// A uniformly random heading at the initial cruising speed.
pub fn random_velocity<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::from_angle(rng.gen_range(0.0..TAU)) * INITIAL_SPEED
}
