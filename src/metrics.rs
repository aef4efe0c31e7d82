/*
 * Metrics Module
 *
 * Distance statistics that describe how tight a flock is. For every boid we
 * take the distance to its nearest and to its farthest flockmate, then
 * summarise both lists with their minimum, mean and maximum.
 *
 * Samples are plain serializable values; writing them anywhere is up to the host.
 */

use serde::{Deserialize, Serialize};

use crate::boid::BoidState;
use crate::flock::Flock;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub min: f32,
    pub avg: f32,
    pub max: f32,
}

impl Summary {
    fn of(values: &[f32]) -> Option<Summary> {
        if values.is_empty() {
            return None;
        }
        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let avg = values.iter().sum::<f32>() / values.len() as f32;
        Some(Summary { min, avg, max })
    }
}

/// Nearest- and farthest-neighbor distance summaries for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceSample {
    pub tick: u64,
    pub nearest: Summary,
    pub farthest: Summary,
}

impl DistanceSample {
    /// `None` when there are fewer than two boids to measure between.
    pub fn from_states(states: &[BoidState], tick: u64) -> Option<DistanceSample> {
        if states.len() < 2 {
            return None;
        }

        let mut nearest = vec![f32::INFINITY; states.len()];
        let mut farthest = vec![0.0f32; states.len()];

        // Each pair is measured once and credited to both ends
        for i in 0..states.len() {
            for j in (i + 1)..states.len() {
                let d = states[i].position.distance(states[j].position);
                nearest[i] = nearest[i].min(d);
                nearest[j] = nearest[j].min(d);
                farthest[i] = farthest[i].max(d);
                farthest[j] = farthest[j].max(d);
            }
        }

        Some(DistanceSample {
            tick,
            nearest: Summary::of(&nearest)?,
            farthest: Summary::of(&farthest)?,
        })
    }

    pub fn from_flock(flock: &Flock) -> Option<DistanceSample> {
        DistanceSample::from_states(&flock.snapshot(), flock.tick_count())
    }
}

/// Collects one [`DistanceSample`] per recorded frame.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsRecorder {
    samples: Vec<DistanceSample>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    // Returns false when the flock was too small to sample
    pub fn record(&mut self, flock: &Flock) -> bool {
        match DistanceSample::from_flock(flock) {
            Some(sample) => {
                self.samples.push(sample);
                true
            }
            None => false,
        }
    }

    pub fn samples(&self) -> &[DistanceSample] {
        &self.samples
    }

    // Hand over everything recorded so far and start again
    pub fn take(&mut self) -> Vec<DistanceSample> {
        std::mem::take(&mut self.samples)
    }
}
