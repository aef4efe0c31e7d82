/*
 * Steering Module
 *
 * This module computes the three flocking forces for one boid against the
 * frozen snapshot of the flock:
 * 1. Alignment: Steer towards the average heading of neighbors
 * 2. Cohesion: Steer towards the average position of neighbors
 * 3. Separation: Steer away from very close neighbors, inverse-square weighted
 *
 * The computation sits behind the SteeringStrategy trait so the flock does
 * not care how the forces are produced. CrispSteering is the reference
 * vector-arithmetic model.
 */

use glam::Vec2;

use crate::boid::BoidState;
use crate::params::FlockConfig;
use crate::vector::seek;

/// The unweighted alignment, cohesion and separation forces for one boid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Steering {
    pub alignment: Vec2,
    pub cohesion: Vec2,
    pub separation: Vec2,
    /// Number of neighbors inside the perception radius.
    pub neighbors: usize,
}

impl Steering {
    pub const NONE: Steering = Steering {
        alignment: Vec2::ZERO,
        cohesion: Vec2::ZERO,
        separation: Vec2::ZERO,
        neighbors: 0,
    };

    // Scale each force by its configured weight
    pub fn weighted(&self, config: &FlockConfig) -> [Vec2; 3] {
        [
            self.alignment * config.alignment_weight,
            self.cohesion * config.cohesion_weight,
            self.separation * config.separation_weight,
        ]
    }
}

/// The other boids one agent may react to during a tick.
///
/// Always a view into the tick's snapshot, optionally narrowed to a set of
/// candidate indices. The agent itself is never yielded.
#[derive(Debug, Clone, Copy)]
pub struct Neighborhood<'a> {
    snapshot: &'a [BoidState],
    candidates: Option<&'a [usize]>,
    agent: usize,
}

impl<'a> Neighborhood<'a> {
    /// Every boid in the snapshot except `agent`.
    pub fn all(snapshot: &'a [BoidState], agent: usize) -> Self {
        Self {
            snapshot,
            candidates: None,
            agent,
        }
    }

    /// Only the boids at `candidates` (in the given order), except `agent`.
    pub fn candidates(snapshot: &'a [BoidState], candidates: &'a [usize], agent: usize) -> Self {
        Self {
            snapshot,
            candidates: Some(candidates),
            agent,
        }
    }

    pub fn agent(&self) -> &'a BoidState {
        &self.snapshot[self.agent]
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a BoidState> + 'a {
        let snapshot = self.snapshot;
        let agent = self.agent;
        let indices: Box<dyn Iterator<Item = usize> + 'a> = match self.candidates {
            Some(candidates) => Box::new(candidates.iter().copied()),
            None => Box::new(0..snapshot.len()),
        };
        indices
            .filter(move |&i| i != agent)
            .map(move |i| &snapshot[i])
    }
}

/// A way of turning a neighborhood into steering forces.
///
/// Implementations only read the snapshot, so the flock may call them from
/// several threads at once.
pub trait SteeringStrategy: Send + Sync {
    fn compute(&self, neighborhood: &Neighborhood<'_>, config: &FlockConfig) -> Steering;
}

/// Reynolds-style steering: each force is "desired velocity minus current velocity".
#[derive(Debug, Clone, Copy, Default)]
pub struct CrispSteering;

impl SteeringStrategy for CrispSteering {
    fn compute(&self, neighborhood: &Neighborhood<'_>, config: &FlockConfig) -> Steering {
        let me = neighborhood.agent();

        let mut align_sum = Vec2::ZERO;
        let mut cohere_sum = Vec2::ZERO;
        let mut separate_sum = Vec2::ZERO;
        let mut count = 0usize;

        for other in neighborhood.iter() {
            let offset = me.position - other.position;
            let d = offset.length();

            // Coincident boids have no direction and would divide by zero
            if d <= 0.0 {
                continue;
            }

            if d < config.perception_radius {
                count += 1;
                align_sum += other.velocity;
                cohere_sum += other.position;

                if d < config.separation_radius {
                    separate_sum += offset / (d * d);
                }
            }
        }

        if count == 0 {
            return Steering::NONE;
        }

        let n = count as f32;
        let average_heading = align_sum / n;
        let centroid_offset = cohere_sum / n - me.position;

        Steering {
            alignment: seek_or_zero(average_heading, me.velocity, config.max_speed),
            cohesion: seek_or_zero(centroid_offset, me.velocity, config.max_speed),
            separation: seek_or_zero(separate_sum, me.velocity, config.max_speed),
            neighbors: count,
        }
    }
}

// Zero-length targets have no direction to seek
#[inline]
fn seek_or_zero(desired: Vec2, velocity: Vec2, max_speed: f32) -> Vec2 {
    if desired == Vec2::ZERO {
        Vec2::ZERO
    } else {
        seek(desired, velocity, max_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() <= eps
    }

    fn state(x: f32, y: f32, vx: f32, vy: f32) -> BoidState {
        BoidState {
            position: Vec2::new(x, y),
            velocity: Vec2::new(vx, vy),
        }
    }

    fn config() -> FlockConfig {
        FlockConfig {
            perception_radius: 50.0,
            separation_radius: 5.0,
            max_speed: 4.0,
            max_force: 1.0,
            ..FlockConfig::default()
        }
    }

    #[test]
    fn neighborhood_skips_the_agent() {
        let snapshot = [state(0.0, 0.0, 0.0, 0.0), state(1.0, 0.0, 0.0, 0.0), state(2.0, 0.0, 0.0, 0.0)];

        let all: Vec<_> = Neighborhood::all(&snapshot, 1).iter().map(|s| s.position.x).collect();
        assert_eq!(all, vec![0.0, 2.0]);

        let subset = [2, 1];
        let some: Vec<_> = Neighborhood::candidates(&snapshot, &subset, 1)
            .iter()
            .map(|s| s.position.x)
            .collect();
        assert_eq!(some, vec![2.0]);
    }

    #[test]
    fn isolated_boid_gets_no_steering() {
        let snapshot = [state(0.0, 0.0, 1.0, 0.0), state(100.0, 0.0, -1.0, 0.0)];
        let steering = CrispSteering.compute(&Neighborhood::all(&snapshot, 0), &config());
        assert_eq!(steering, Steering::NONE);
    }

    #[test]
    fn coincident_boids_are_ignored() {
        let snapshot = [state(3.0, 3.0, 1.0, 0.0), state(3.0, 3.0, 0.0, 1.0)];
        let steering = CrispSteering.compute(&Neighborhood::all(&snapshot, 0), &config());
        assert_eq!(steering, Steering::NONE);
    }

    #[test]
    fn equal_velocities_give_zero_alignment_and_mutual_cohesion() {
        let snapshot = [state(0.0, 0.0, 4.0, 0.0), state(25.0, 0.0, 4.0, 0.0)];
        let cfg = config();

        let a = CrispSteering.compute(&Neighborhood::all(&snapshot, 0), &cfg);
        let b = CrispSteering.compute(&Neighborhood::all(&snapshot, 1), &cfg);

        assert_eq!(a.neighbors, 1);
        assert!(a.alignment.length() < 1e-5);
        assert!(b.alignment.length() < 1e-5);

        // Desired velocity points at the other boid; both are mirror images
        assert!(approx_eq(a.cohesion.x, 0.0, 1e-5));
        assert!(approx_eq(b.cohesion.x, -8.0, 1e-5));
        assert_eq!(a.separation, Vec2::ZERO);
    }

    #[test]
    fn stationary_pair_cohesion_points_at_each_other() {
        let snapshot = [state(0.0, 0.0, 0.0, 0.0), state(25.0, 0.0, 0.0, 0.0)];
        let cfg = config();

        let a = CrispSteering.compute(&Neighborhood::all(&snapshot, 0), &cfg);
        let b = CrispSteering.compute(&Neighborhood::all(&snapshot, 1), &cfg);

        assert!(approx_eq(a.cohesion.x, 4.0, 1e-5));
        assert!(approx_eq(b.cohesion.x, -4.0, 1e-5));
        assert_eq!(a.cohesion, -b.cohesion);
        assert_eq!(a.alignment, Vec2::ZERO);
    }

    #[test]
    fn separation_pushes_away_from_close_neighbors() {
        let snapshot = [state(0.0, 0.0, 0.0, 0.0), state(2.0, 0.0, 0.0, 0.0)];
        let steering = CrispSteering.compute(&Neighborhood::all(&snapshot, 0), &config());

        assert!(steering.separation.x < 0.0);
        assert!(approx_eq(steering.separation.length(), 4.0, 1e-5));
    }

    #[test]
    fn separation_is_inverse_square_weighted() {
        // A close neighbor on the left outweighs a farther one on the right
        let snapshot = [
            state(0.0, 0.0, 0.0, 0.0),
            state(-1.0, 0.0, 0.0, 0.0),
            state(0.0, 3.0, 0.0, 0.0),
        ];
        let cfg = FlockConfig {
            separation_radius: 10.0,
            ..config()
        };
        let steering = CrispSteering.compute(&Neighborhood::all(&snapshot, 0), &cfg);

        // raw sum = (1, 0) / 1 + (0, -3) / 9 = (1, -1/3)
        let expected = Vec2::new(1.0, -1.0 / 3.0).normalize() * 4.0;
        assert!(approx_eq(steering.separation.x, expected.x, 1e-5));
        assert!(approx_eq(steering.separation.y, expected.y, 1e-5));
    }

    #[test]
    fn separation_outside_perception_does_not_count_as_neighbor() {
        let snapshot = [state(0.0, 0.0, 0.0, 0.0), state(8.0, 0.0, 0.0, 0.0)];
        let cfg = FlockConfig {
            perception_radius: 5.0,
            separation_radius: 10.0,
            ..config()
        };
        let steering = CrispSteering.compute(&Neighborhood::all(&snapshot, 0), &cfg);

        // No neighbor in perception range, so the whole steering is zero
        assert_eq!(steering, Steering::NONE);
    }

    #[test]
    fn separation_only_counts_perceived_neighbors() {
        let snapshot = [
            state(0.0, 0.0, 0.0, 0.0),
            state(0.0, 4.0, 0.0, 0.0),
            state(-6.0, 0.0, 0.0, 0.0),
        ];
        let cfg = FlockConfig {
            perception_radius: 5.0,
            separation_radius: 10.0,
            ..config()
        };
        let steering = CrispSteering.compute(&Neighborhood::all(&snapshot, 0), &cfg);

        // The boid at (-6, 0) is inside the separation radius but not perceived
        assert_eq!(steering.neighbors, 1);
        assert_eq!(steering.separation.x, 0.0);
        assert!(approx_eq(steering.separation.y, -4.0, 1e-5));
    }

    #[test]
    fn weighted_scales_each_component() {
        let steering = Steering {
            alignment: Vec2::new(1.0, 0.0),
            cohesion: Vec2::new(0.0, 1.0),
            separation: Vec2::new(1.0, 1.0),
            neighbors: 3,
        };
        let cfg = FlockConfig {
            alignment_weight: 0.5,
            cohesion_weight: 2.0,
            separation_weight: 0.0,
            ..FlockConfig::default()
        };
        let [a, c, s] = steering.weighted(&cfg);
        assert_eq!(a, Vec2::new(0.5, 0.0));
        assert_eq!(c, Vec2::new(0.0, 2.0));
        assert_eq!(s, Vec2::ZERO);
    }
}
