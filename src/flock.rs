/*
 * Flock Module
 *
 * This module owns the set of boids and advances the simulation one tick at
 * a time. Every tick works in two phases:
 * 1. Freeze a snapshot of all positions and velocities, then compute each
 *    boid's steering against that snapshot (optionally in parallel)
 * 2. Apply the weighted forces, the boundary policy and integration to each
 *    boid in index order
 *
 * Because phase 1 only reads the snapshot, no boid ever sees another boid's
 * updated position within the same tick.
 */

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::boid::{random_velocity, Boid, BoidState};
use crate::error::ConfigError;
use crate::params::{FlockConfig, NeighborSearch};
use crate::spatial_grid::SpatialGrid;
use crate::steering::{CrispSteering, Neighborhood, Steering, SteeringStrategy};
use crate::WRAP_MARGIN;

/// Axis-aligned rectangle that initial positions are drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl SpawnBounds {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    // The whole world described by a config
    pub fn world(config: &FlockConfig) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(config.width, config.height))
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            rng.gen_range(self.min.x..=self.max.x),
            rng.gen_range(self.min.y..=self.max.y),
        )
    }
}

/// What happened during one call to [`Flock::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    /// Tick counter after this tick.
    pub tick: u64,
    pub agents: usize,
    /// Agents with at least one neighbor inside the perception radius.
    pub agents_with_neighbors: usize,
    /// Largest acceleration magnitude seen right before integration.
    pub max_applied_force: f32,
}

pub struct Flock {
    boids: Vec<Boid>,
    strategy: Box<dyn SteeringStrategy>,
    rng: SmallRng,
    grid: Option<SpatialGrid>,
    tick: u64,
}

impl Flock {
    /// An empty flock. `seed` makes later random spawns reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        Self {
            boids: Vec::new(),
            strategy: Box::new(CrispSteering),
            rng: SmallRng::seed_from_u64(seed),
            grid: None,
            tick: 0,
        }
    }

    /// A flock of `count` boids at random positions inside `bounds`,
    /// each heading in a random direction.
    pub fn create(count: usize, bounds: SpawnBounds, seed: Option<u64>) -> Self {
        let mut flock = Flock::new(seed);
        flock.boids.reserve(count);
        for _ in 0..count {
            let position = bounds.sample(&mut flock.rng);
            let boid = Boid::with_random_velocity(position, &mut flock.rng);
            flock.boids.push(boid);
        }
        debug!(count, ?seed, "created flock");
        flock
    }

    /// A flock made of exactly these boids, in this order. `seed` drives
    /// later random spawns, as in [`Flock::new`].
    pub fn from_boids(boids: Vec<Boid>, seed: Option<u64>) -> Self {
        let mut flock = Flock::new(seed);
        flock.boids = boids;
        flock
    }

    pub fn with_strategy(mut self, strategy: Box<dyn SteeringStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn set_strategy(&mut self, strategy: Box<dyn SteeringStrategy>) {
        self.strategy = strategy;
    }

    /// Add a boid between ticks. Without a velocity it heads in a random
    /// direction. Returns the new boid's index.
    pub fn spawn(&mut self, position: Vec2, velocity: Option<Vec2>) -> usize {
        let velocity = velocity.unwrap_or_else(|| random_velocity(&mut self.rng));
        self.boids.push(Boid::new(position, velocity));
        let index = self.boids.len() - 1;
        debug!(index, x = position.x, y = position.y, "spawned boid");
        index
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.boids.iter().map(|boid| boid.position)
    }

    pub fn velocities(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.boids.iter().map(|boid| boid.velocity)
    }

    /// Positions and velocities of every boid, frozen.
    pub fn snapshot(&self) -> Vec<BoidState> {
        self.boids.iter().map(Boid::state).collect()
    }

    /// Steering for every boid against `snapshot`, in index order.
    pub fn compute_steering(&mut self, snapshot: &[BoidState], config: &FlockConfig) -> Vec<Steering> {
        let strategy = self.strategy.as_ref();
        let n = snapshot.len();

        match config.neighbor_search {
            NeighborSearch::BruteForce => collect_steering(n, config.parallel, |i| {
                strategy.compute(&Neighborhood::all(snapshot, i), config)
            }),
            NeighborSearch::Grid => {
                let grid = prepared_grid(&mut self.grid, snapshot, config);
                collect_steering(n, config.parallel, |i| {
                    let position = snapshot[i].position;
                    let candidates = grid.nearby_indices(position.x, position.y);
                    strategy.compute(&Neighborhood::candidates(snapshot, &candidates, i), config)
                })
            }
        }
    }

    /// Advance the simulation by one frame.
    ///
    /// The config is validated first; on error no boid is modified.
    pub fn tick(&mut self, config: &FlockConfig) -> Result<TickReport, ConfigError> {
        if let Err(err) = config.validate() {
            debug!(%err, "rejected flock configuration");
            return Err(err);
        }
        if self.boids.is_empty() {
            return Err(ConfigError::EmptyFlock);
        }

        let snapshot = self.snapshot();
        let steering = self.compute_steering(&snapshot, config);

        let mut report = TickReport {
            agents: self.boids.len(),
            ..TickReport::default()
        };

        for (boid, steer) in self.boids.iter_mut().zip(&steering) {
            let applied = boid.advance(steer.weighted(config), config, WRAP_MARGIN);

            report.max_applied_force = report.max_applied_force.max(applied);
            if steer.neighbors > 0 {
                report.agents_with_neighbors += 1;
            }
        }

        self.tick += 1;
        report.tick = self.tick;

        if tracing::enabled!(tracing::Level::TRACE) {
            let mean_speed =
                self.boids.iter().map(|b| b.velocity.length()).sum::<f32>() / self.boids.len() as f32;
            trace!(
                tick = report.tick,
                agents = report.agents,
                with_neighbors = report.agents_with_neighbors,
                mean_speed,
                "flock tick"
            );
        }

        Ok(report)
    }
}

// Run `steer` for every index, on the rayon pool when `parallel` is set
fn collect_steering<F>(n: usize, parallel: bool, steer: F) -> Vec<Steering>
where
    F: Fn(usize) -> Steering + Sync + Send,
{
    if parallel {
        (0..n).into_par_iter().map(steer).collect()
    } else {
        (0..n).map(steer).collect()
    }
}

// Reuse the cached grid when its shape still fits, then fill it from the snapshot
fn prepared_grid<'g>(
    slot: &'g mut Option<SpatialGrid>,
    snapshot: &[BoidState],
    config: &FlockConfig,
) -> &'g SpatialGrid {
    let cell_size = config.interaction_radius();
    if !slot
        .as_ref()
        .is_some_and(|grid| grid.matches(cell_size, config.width, config.height))
    {
        *slot = None;
    }

    let grid = slot.get_or_insert_with(|| SpatialGrid::new(cell_size, config.width, config.height));
    grid.rebuild(snapshot);
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::BoundaryMode;

    fn config() -> FlockConfig {
        FlockConfig {
            width: 200.0,
            height: 200.0,
            ..FlockConfig::default()
        }
    }

    #[test]
    fn create_is_reproducible_with_a_seed() {
        let bounds = SpawnBounds::new(Vec2::ZERO, Vec2::new(100.0, 50.0));
        let a = Flock::create(25, bounds, Some(42));
        let b = Flock::create(25, bounds, Some(42));

        assert_eq!(a.len(), 25);
        assert_eq!(a.boids(), b.boids());
        for p in a.positions() {
            assert!((0.0..=100.0).contains(&p.x));
            assert!((0.0..=50.0).contains(&p.y));
        }
    }

    #[test]
    fn spawn_appends_and_keeps_given_velocity() {
        let mut flock = Flock::new(Some(1));
        let index = flock.spawn(Vec2::new(3.0, 4.0), Some(Vec2::new(1.0, 0.0)));
        assert_eq!(index, 0);
        assert_eq!(flock.boids()[0].velocity, Vec2::new(1.0, 0.0));

        let index = flock.spawn(Vec2::new(5.0, 5.0), None);
        assert_eq!(index, 1);
        assert!(flock.boids()[1].velocity.length() > 0.0);
    }

    #[test]
    fn tick_on_empty_flock_fails() {
        let mut flock = Flock::new(Some(1));
        assert!(matches!(flock.tick(&config()), Err(ConfigError::EmptyFlock)));
        assert_eq!(flock.tick_count(), 0);
    }

    #[test]
    fn invalid_config_leaves_boids_untouched() {
        let mut flock = Flock::create(10, SpawnBounds::world(&config()), Some(3));
        let before = flock.boids().to_vec();

        let bad = FlockConfig {
            max_speed: -1.0,
            ..config()
        };
        assert!(flock.tick(&bad).is_err());
        assert_eq!(flock.boids(), before.as_slice());
        assert_eq!(flock.tick_count(), 0);
    }

    #[test]
    fn tick_report_counts_neighbors() {
        let mut flock = Flock::from_boids(vec![
            Boid::new(Vec2::new(50.0, 50.0), Vec2::new(1.0, 0.0)),
            Boid::new(Vec2::new(60.0, 50.0), Vec2::new(1.0, 0.0)),
            Boid::new(Vec2::new(180.0, 180.0), Vec2::new(0.0, 1.0)),
        ], None);
        let report = flock.tick(&config()).unwrap();

        assert_eq!(report.tick, 1);
        assert_eq!(report.agents, 3);
        assert_eq!(report.agents_with_neighbors, 2);
        assert!(report.max_applied_force <= config().max_force + 1e-5);
    }

    #[test]
    fn custom_strategy_is_used() {
        struct PushRight;
        impl SteeringStrategy for PushRight {
            fn compute(&self, _: &Neighborhood<'_>, _: &FlockConfig) -> Steering {
                Steering {
                    alignment: Vec2::new(1.0, 0.0),
                    ..Steering::NONE
                }
            }
        }

        let mut flock = Flock::from_boids(vec![Boid::new(Vec2::new(50.0, 50.0), Vec2::ZERO)], None)
            .with_strategy(Box::new(PushRight));
        let cfg = FlockConfig {
            alignment_weight: 1.0,
            ..config()
        };
        flock.tick(&cfg).unwrap();

        assert_eq!(flock.boids()[0].velocity, Vec2::new(1.0, 0.0));
        assert_eq!(flock.boids()[0].position, Vec2::new(51.0, 50.0));
    }

    #[test]
    fn soft_confine_clamps_once_over_steering_and_border() {
        struct PushHarder;
        impl SteeringStrategy for PushHarder {
            fn compute(&self, _: &Neighborhood<'_>, _: &FlockConfig) -> Steering {
                Steering {
                    alignment: Vec2::new(5.0, 0.0),
                    ..Steering::NONE
                }
            }
        }

        let cfg = FlockConfig {
            alignment_weight: 1.0,
            boundary: BoundaryMode::SoftConfine,
            ..FlockConfig::default()
        };
        let mut flock =
            Flock::from_boids(vec![Boid::new(Vec2::new(600.0, 240.0), Vec2::new(2.0, 0.0))], None)
                .with_strategy(Box::new(PushHarder));
        let report = flock.tick(&cfg).unwrap();

        // (5, 0) + border (-4, 0) is clamped as one sum, so the boid keeps heading right
        assert!((report.max_applied_force - 1.0).abs() < 1e-6);
        assert!((flock.boids()[0].velocity.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn from_boids_seed_drives_random_spawns() {
        let start = || vec![Boid::new(Vec2::new(10.0, 10.0), Vec2::ZERO)];
        let mut a = Flock::from_boids(start(), Some(4));
        let mut b = Flock::from_boids(start(), Some(4));
        let mut c = Flock::from_boids(start(), Some(5));

        a.spawn(Vec2::ZERO, None);
        b.spawn(Vec2::ZERO, None);
        c.spawn(Vec2::ZERO, None);

        assert_eq!(a.boids()[1].velocity, b.boids()[1].velocity);
        assert_ne!(a.boids()[1].velocity, c.boids()[1].velocity);
    }

    #[test]
    fn grid_is_rebuilt_when_radius_changes() {
        let mut flock = Flock::create(30, SpawnBounds::world(&config()), Some(9));
        let mut cfg = FlockConfig {
            neighbor_search: NeighborSearch::Grid,
            ..config()
        };
        flock.tick(&cfg).unwrap();
        assert_eq!(flock.grid.as_ref().map(|g| g.cell_size), Some(80.0));

        cfg.perception_radius = 20.0;
        flock.tick(&cfg).unwrap();
        assert_eq!(flock.grid.as_ref().map(|g| g.cell_size), Some(30.0));
    }
}
