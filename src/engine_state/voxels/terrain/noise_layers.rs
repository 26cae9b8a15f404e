//! # Noise Layers
//!
//! Seeded 2D Perlin layers used by the terrain generator. Each layer owns its own Perlin
//! permutation and a seed-derived phase offset, so two layers never line up even when
//! they are sampled at the same coordinates.
//!
//! Samples are remapped from Perlin's signed output into `[0, 1]`.

use noise::{NoiseFn, Perlin};

/// Frequency of the land/ocean plate signal.
pub const CONTINENT_FREQUENCY: f64 = 0.02;
/// Frequency of the small base-height term added on land.
pub const BASE_FREQUENCY: f64 = 0.05;
/// Frequency of the two cave samples.
pub const CAVE_FREQUENCY: f64 = 0.1;
/// Frequency of the temperature field that picks surface biomes.
pub const TEMPERATURE_FREQUENCY: f64 = 0.03;
/// Frequency of the patch field that scatters dirt, clay and gravel.
pub const PATCH_FREQUENCY: f64 = 0.15;

/// Range of the seed-derived phase offset, in blocks.
const PHASE_RANGE: f64 = 4096.0;
/// Largest scaled coordinate magnitude handed to Perlin (2^52). Past it, f64 has no
/// fractional bits left to vary the noise over.
const MAX_COORDINATE: f64 = 4_503_599_627_370_496.0;

/// A single seeded 2D noise field.
#[derive(Clone, Debug)]
pub struct NoiseLayer {
    /// Layer name, reported when a sample is not finite
    pub name: &'static str,
    perlin: Perlin,
    frequency: f64,
    phase: [f64; 2],
}

impl NoiseLayer {
    /// Creates a layer.
    ///
    /// # Arguments
    /// * `name` - Name used in error reports
    /// * `seed` - The world seed
    /// * `index` - Distinguishes layers built from the same seed
    /// * `frequency` - Scale applied to block coordinates before sampling
    pub fn new(name: &'static str, seed: u64, index: u32, frequency: f64) -> Self {
        let perlin_seed = ((seed ^ (seed >> 32)) as u32).wrapping_add(index.wrapping_mul(0x9E37_79B9));
        let mut rng = fastrand::Rng::with_seed(seed ^ u64::from(index).wrapping_mul(0xA24B_AED4_963E_E407));
        NoiseLayer {
            name,
            perlin: Perlin::new(perlin_seed),
            frequency,
            phase: [rng.f64() * PHASE_RANGE, rng.f64() * PHASE_RANGE],
        }
    }

    /// Samples the layer at `(a, b)`, returning a value in `[0, 1]`.
    ///
    /// Returns NaN instead of sampling when a scaled coordinate is not finite or too large
    /// for the lattice to resolve.
    pub fn sample(&self, a: f64, b: f64) -> f64 {
        let point = [
            (a + self.phase[0]) * self.frequency,
            (b + self.phase[1]) * self.frequency,
        ];
        if !point.iter().all(|c| c.abs() <= MAX_COORDINATE) {
            return f64::NAN;
        }
        let raw = self.perlin.get(point);
        if raw.is_finite() {
            (raw * 0.5 + 0.5).clamp(0.0, 1.0)
        } else {
            raw
        }
    }
}

/// All layers used by one generation run.
#[derive(Clone, Debug)]
pub struct NoiseLayers {
    pub continent: NoiseLayer,
    pub ridge: NoiseLayer,
    pub base: NoiseLayer,
    pub cave_a: NoiseLayer,
    pub cave_b: NoiseLayer,
    pub temperature: NoiseLayer,
    pub patch: NoiseLayer,
}

impl NoiseLayers {
    /// Builds every layer from the world seed.
    ///
    /// # Arguments
    /// * `seed` - The world seed
    /// * `ridge_frequency` - Frequency of the ridged mountain layer
    pub fn new(seed: u64, ridge_frequency: f64) -> Self {
        NoiseLayers {
            continent: NoiseLayer::new("continent", seed, 0, CONTINENT_FREQUENCY),
            ridge: NoiseLayer::new("ridge", seed, 1, ridge_frequency),
            base: NoiseLayer::new("base", seed, 2, BASE_FREQUENCY),
            cave_a: NoiseLayer::new("cave_a", seed, 3, CAVE_FREQUENCY),
            cave_b: NoiseLayer::new("cave_b", seed, 4, CAVE_FREQUENCY),
            temperature: NoiseLayer::new("temperature", seed, 5, TEMPERATURE_FREQUENCY),
            patch: NoiseLayer::new("patch", seed, 6, PATCH_FREQUENCY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_normalized_and_repeatable() {
        let a = NoiseLayer::new("test", 7, 0, 0.05);
        let b = NoiseLayer::new("test", 7, 0, 0.05);
        for i in 0..200 {
            let (x, z) = (i as f64 * 1.7, i as f64 * -3.1);
            let s = a.sample(x, z);
            assert!((0.0..=1.0).contains(&s));
            assert_eq!(s, b.sample(x, z));
        }
    }

    #[test]
    fn unresolvable_coordinates_sample_as_nan() {
        let layer = NoiseLayer::new("ridge", 3, 1, 1.0e30);
        assert!(layer.sample(0.0, 0.0).is_nan());
        assert!(layer.sample(31.0, 17.0).is_nan());

        let layer = NoiseLayer::new("ridge", 3, 1, 0.05);
        assert!(layer.sample(f64::INFINITY, 0.0).is_nan());
        assert!(layer.sample(0.0, -1.0e300).is_nan());
        assert!(layer.sample(0.0, 0.0).is_finite());
    }

    #[test]
    fn seeds_and_indices_decorrelate_layers() {
        let a = NoiseLayer::new("a", 1, 0, 0.05);
        let b = NoiseLayer::new("b", 2, 0, 0.05);
        let c = NoiseLayer::new("c", 1, 1, 0.05);
        let differs = |other: &NoiseLayer| {
            (0..50).any(|i| a.sample(i as f64 * 3.3, i as f64) != other.sample(i as f64 * 3.3, i as f64))
        };
        assert!(differs(&b));
        assert!(differs(&c));
    }
}
