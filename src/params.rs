/*
 * Simulation Parameters Module
 *
 * This module defines the FlockConfig struct that holds every externally
 * supplied parameter of the simulation: steering weights, radii, speed and
 * force limits, the world rectangle and the boundary policy. A host may
 * change any field between ticks; the flock only reads it during a tick.
 */

use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::HOME_BORDER_FRACTION;

/// What happens to an agent at the edge of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// Teleport to the opposite edge once fully out of view.
    #[default]
    Wraparound,
    /// Steer back inside once past the home border.
    SoftConfine,
}

/// How candidate neighbors are found for each agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborSearch {
    /// Scan every other agent in the snapshot.
    #[default]
    BruteForce,
    /// Only scan agents in the surrounding grid cells.
    Grid,
}

// Parameters for the simulation that can be adjusted between ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockConfig {
    pub max_force: f32,
    pub max_speed: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub separation_weight: f32,
    pub perception_radius: f32, // alignment and cohesion range
    pub separation_radius: f32,
    pub width: f32,
    pub height: f32,
    pub boundary: BoundaryMode,
    // Performance settings
    pub neighbor_search: NeighborSearch,
    pub parallel: bool,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            max_force: 1.0,
            max_speed: 2.0,
            alignment_weight: 0.3,
            cohesion_weight: 1.2,
            separation_weight: 1.4,
            perception_radius: 80.0,
            separation_radius: 30.0,
            width: 640.0,
            height: 480.0,
            boundary: BoundaryMode::Wraparound,
            neighbor_search: NeighborSearch::BruteForce,
            parallel: false,
        }
    }
}

impl FlockConfig {
    /// Parse a (possibly partial) JSON document and validate the result.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Reject configurations the steering math cannot run under.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("max_force", self.max_force),
            ("max_speed", self.max_speed),
            ("alignment_weight", self.alignment_weight),
            ("cohesion_weight", self.cohesion_weight),
            ("separation_weight", self.separation_weight),
            ("perception_radius", self.perception_radius),
            ("separation_radius", self.separation_radius),
            ("width", self.width),
            ("height", self.height),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }

        let positive = [
            ("max_speed", self.max_speed),
            ("perception_radius", self.perception_radius),
            ("separation_radius", self.separation_radius),
            ("width", self.width),
            ("height", self.height),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let non_negative = [
            ("max_force", self.max_force),
            ("alignment_weight", self.alignment_weight),
            ("cohesion_weight", self.cohesion_weight),
            ("separation_weight", self.separation_weight),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        Ok(())
    }

    /// Distance from each edge at which soft confinement starts pushing back.
    pub fn home_border(&self) -> f32 {
        HOME_BORDER_FRACTION * self.width.min(self.height)
    }

    // Largest interaction radius, used to size grid cells
    pub fn interaction_radius(&self) -> f32 {
        self.perception_radius.max(self.separation_radius)
    }

    // Get parameter ranges for UI sliders
    pub fn weight_range() -> RangeInclusive<f32> {
        0.0..=10.0
    }

    pub fn max_speed_range() -> RangeInclusive<f32> {
        0.1..=8.0
    }

    pub fn max_force_range() -> RangeInclusive<f32> {
        0.0..=2.0
    }

    // Radii are capped at half the smaller world dimension
    pub fn radius_range(&self) -> RangeInclusive<f32> {
        1.0..=(self.width.min(self.height) / 2.0).max(1.0)
    }
}
