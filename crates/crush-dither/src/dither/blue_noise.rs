//! Synthesized blue-noise threshold texture.
//!
//! The texture is built by repeatedly high-pass filtering white noise and
//! re-ranking the result:
//!
//! 1. Fill a 64x64 grid with uniform random values from a seeded RNG
//! 2. Subtract a 3x3 wrap-around box blur (removes low frequencies)
//! 3. Replace every value by its rank divided by 4096
//!
//! Steps 2 and 3 run four times. Ranking keeps the histogram perfectly flat,
//! so thresholds are evenly spaced in `[0, 1)` and unique. Wrap-around
//! filtering makes the texture tile seamlessly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::ordered::OFFSET_SPAN;

/// Side length of the texture.
pub const BLUE_NOISE_SIZE: usize = 64;

/// Seed used when none is configured.
pub const DEFAULT_BLUE_NOISE_SEED: u64 = 0x5EED_B10E;

const CELLS: usize = BLUE_NOISE_SIZE * BLUE_NOISE_SIZE;
const PASSES: usize = 4;

/// A tileable 64x64 threshold texture with values in `[0, 1)`.
#[derive(Debug, Clone)]
pub struct BlueNoise {
    values: Vec<f32>,
}

impl BlueNoise {
    /// Synthesize the texture from `seed`.
    ///
    /// The same seed always yields the same texture.
    pub fn generate(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut values: Vec<f32> = (0..CELLS).map(|_| rng.gen::<f32>()).collect();

        for _ in 0..PASSES {
            high_pass(&mut values);
            rank_normalize(&mut values);
        }

        tracing::debug!(seed, "Generated blue noise texture");
        Self { values }
    }

    /// Threshold at `(x, y)`, tiled.
    #[inline]
    pub fn value(&self, x: usize, y: usize) -> f32 {
        self.values[(y % BLUE_NOISE_SIZE) * BLUE_NOISE_SIZE + (x % BLUE_NOISE_SIZE)]
    }

    /// Offset at `(x, y)`: `(value - 0.5) * 64`, in `[-32, 32)`.
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> f32 {
        (self.value(x, y) - 0.5) * OFFSET_SPAN
    }

    /// All thresholds in row-major order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

fn high_pass(values: &mut [f32]) {
    let n = BLUE_NOISE_SIZE;
    let blurred: Vec<f32> = (0..CELLS)
        .map(|i| {
            let (x, y) = (i % n, i / n);
            let mut sum = 0.0;
            for dy in [n - 1, 0, 1] {
                for dx in [n - 1, 0, 1] {
                    sum += values[((y + dy) % n) * n + (x + dx) % n];
                }
            }
            sum / 9.0
        })
        .collect();

    for (v, b) in values.iter_mut().zip(blurred) {
        *v -= b;
    }
}

fn rank_normalize(values: &mut [f32]) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]).then(a.cmp(&b)));

    let len = values.len() as f32;
    for (rank, idx) in order.into_iter().enumerate() {
        values[idx] = rank as f32 / len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_are_evenly_spaced_ranks() {
        let noise = BlueNoise::generate(DEFAULT_BLUE_NOISE_SEED);
        let mut sorted = noise.values().to_vec();
        sorted.sort_by(f32::total_cmp);
        for (k, v) in sorted.iter().enumerate() {
            assert_eq!(*v, k as f32 / CELLS as f32, "rank {k} has value {v}");
        }
    }

    #[test]
    fn test_offsets_within_range() {
        let noise = BlueNoise::generate(7);
        for y in 0..BLUE_NOISE_SIZE {
            for x in 0..BLUE_NOISE_SIZE {
                let o = noise.offset(x, y);
                assert!((-32.0..32.0).contains(&o), "offset {o} at ({x},{y})");
            }
        }
    }

    #[test]
    fn test_same_seed_same_texture() {
        let a = BlueNoise::generate(42);
        let b = BlueNoise::generate(42);
        assert_eq!(a.values(), b.values());

        let c = BlueNoise::generate(43);
        assert_ne!(a.values(), c.values());
    }

    #[test]
    fn test_texture_tiles() {
        let noise = BlueNoise::generate(1);
        assert_eq!(noise.value(3, 5), noise.value(3 + 64, 5 + 128));
    }

    #[test]
    fn test_neighbors_are_decorrelated() {
        // High-pass filtering pushes horizontally adjacent thresholds apart;
        // white noise would average about 1/3.
        let noise = BlueNoise::generate(DEFAULT_BLUE_NOISE_SEED);
        let mut total = 0.0;
        for y in 0..BLUE_NOISE_SIZE {
            for x in 0..BLUE_NOISE_SIZE {
                total += (noise.value(x, y) - noise.value(x + 1, y)).abs();
            }
        }
        let mean = total / CELLS as f32;
        assert!(
            mean > 0.34,
            "mean neighbor difference {mean} should exceed white noise"
        );
    }
}
