//! Procedural level generation.
//!
//! Obstacles along the ground row are laid out as an arrival process: the gap
//! to the next obstacle is drawn from an exponential distribution by inverse
//! CDF sampling and rounded up to whole cells. With rate `-ln(1 - p)` the
//! rounded gap is geometric, so every cell independently holds an obstacle
//! with probability `p`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::level::{LEVEL_HEIGHT_CELLS, LEVEL_LENGTH_CELLS, Level, LevelObject};

/// Tuning for [`generate_level`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Per-cell probability of a spike.
    pub spike_probability: f64,
    /// Per-cell probability of a solid block.
    pub solid_probability: f64,
    /// Leading cells that are always left empty.
    pub safe_prefix: i32,
    /// Chance of adding a single spike when a level came out empty.
    pub fallback_spike_probability: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            spike_probability: 0.18,
            solid_probability: 0.04,
            safe_prefix: 3,
            fallback_spike_probability: 0.7,
        }
    }
}

/// Draws an exponential inter-arrival gap and rounds it up to whole cells.
#[allow(clippy::cast_possible_truncation)]
fn sample_gap<R: Rng>(rng: &mut R, rate: f64, limit: i32) -> i32 {
    let u: f64 = rng.random();
    let gap = -(1.0 - u).ln() / rate;
    // Anything past the level end is equivalent, so clamp before casting.
    gap.ceil().clamp(1.0, f64::from(limit)) as i32
}

/// Cells in `start..end` at which an obstacle arrives.
fn arrivals<R: Rng>(rng: &mut R, probability: f64, start: i32, end: i32) -> Vec<i32> {
    if probability <= 0.0 || start >= end {
        return Vec::new();
    }
    if probability >= 1.0 {
        return (start..end).collect();
    }

    let rate = -(1.0 - probability).ln();
    let mut cells = Vec::new();
    let mut cursor = start - 1;
    loop {
        cursor += sample_gap(rng, rate, end - start + 1);
        if cursor >= end {
            break;
        }
        cells.push(cursor);
    }
    cells
}

/// Generates a standard-size level with obstacles on the ground row.
pub fn generate_level<R: Rng>(rng: &mut R, config: &GeneratorConfig) -> Level {
    let length = LEVEL_LENGTH_CELLS;
    let ground_row = LEVEL_HEIGHT_CELLS - 1;
    let start = config.safe_prefix.max(0);

    let mut spikes = arrivals(rng, config.spike_probability, start, length);
    let solids = arrivals(rng, config.solid_probability, start, length);

    let fallback = config.fallback_spike_probability.clamp(0.0, 1.0);
    if spikes.is_empty() && length > start + 1 && rng.random_bool(fallback) {
        spikes.push(start + 1);
    }

    let mut objects: Vec<LevelObject> = spikes
        .iter()
        .map(|&x| LevelObject::spike(x, ground_row))
        .collect();
    objects.extend(
        solids
            .into_iter()
            .filter(|x| !spikes.contains(x))
            .map(|x| LevelObject::solid(x, ground_row)),
    );

    tracing::debug!(
        spikes = spikes.len(),
        objects = objects.len(),
        "Generated level"
    );
    Level::new(length, LEVEL_HEIGHT_CELLS, objects)
}
