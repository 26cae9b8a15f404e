//! # World Configuration
//!
//! The flat record that parameterises world generation. Values arrive from continuous
//! editor controls, so the builder-style setters clamp into the documented ranges
//! instead of rejecting anything. A config can also be loaded from JSON.

use std::ops::RangeInclusive;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Valid number of chunks along each axis of the cubic lattice.
pub const WORLD_SIZE_RANGE: RangeInclusive<i32> = 1..=8;
/// Valid base planet radius in blocks.
pub const PLANET_RADIUS_RANGE: RangeInclusive<i32> = 10..=60;
/// Valid sea level, as a distance from the world center.
pub const SEA_LEVEL_RANGE: RangeInclusive<f32> = 10.0..=70.0;
/// Valid terrain noise frequency.
pub const NOISE_FREQUENCY_RANGE: RangeInclusive<f32> = 0.01..=0.2;
/// Valid terrain noise amplitude in blocks.
pub const NOISE_AMPLITUDE_RANGE: RangeInclusive<f32> = 0.0..=20.0;
/// Valid range of the continent and cave thresholds.
pub const THRESHOLD_RANGE: RangeInclusive<f32> = 0.0..=1.0;

/// Generation parameters for a planet.
///
/// The world copies this record into the terrain generator at generation time, so
/// editing a config never changes chunks that were already built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for every noise layer and for the generation random stream.
    pub seed: u64,
    /// Chunks along each axis of the cubic lattice.
    pub world_size: i32,
    /// Base radius of the planet surface, in blocks from the world center.
    pub planet_radius: i32,
    /// Distance from the world center below which open cells fill with water.
    pub sea_level: f32,
    /// Frequency of the ridged mountain noise.
    pub noise_frequency: f32,
    /// Height scale of all elevation noise, in blocks.
    pub noise_amplitude: f32,
    /// Continent signal above which a column is land.
    pub continent_threshold: f32,
    /// Cave signal above which a solid cell is hollowed out.
    pub cave_threshold: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: 0,
            world_size: 4,
            planet_radius: 24,
            sea_level: 26.0,
            noise_frequency: 0.05,
            noise_amplitude: 8.0,
            continent_threshold: 0.45,
            cave_threshold: 0.65,
        }
    }
}

fn clamp_i32(name: &str, value: i32, range: &RangeInclusive<i32>) -> i32 {
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != value {
        warn!("{} = {} is out of range, clamped to {}", name, value, clamped);
    }
    clamped
}

fn clamp_f32(name: &str, value: f32, range: &RangeInclusive<f32>, fallback: f32) -> f32 {
    if !value.is_finite() {
        warn!("{} = {} is not finite, using {}", name, value, fallback);
        return fallback;
    }
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != value {
        warn!("{} = {} is out of range, clamped to {}", name, value, clamped);
    }
    clamped
}

impl WorldConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_world_size(mut self, world_size: i32) -> Self {
        self.world_size = clamp_i32("world_size", world_size, &WORLD_SIZE_RANGE);
        self
    }

    pub fn with_planet_radius(mut self, planet_radius: i32) -> Self {
        self.planet_radius = clamp_i32("planet_radius", planet_radius, &PLANET_RADIUS_RANGE);
        self
    }

    pub fn with_sea_level(mut self, sea_level: f32) -> Self {
        self.sea_level = clamp_f32("sea_level", sea_level, &SEA_LEVEL_RANGE, Self::default().sea_level);
        self
    }

    pub fn with_noise_frequency(mut self, noise_frequency: f32) -> Self {
        self.noise_frequency = clamp_f32(
            "noise_frequency",
            noise_frequency,
            &NOISE_FREQUENCY_RANGE,
            Self::default().noise_frequency,
        );
        self
    }

    pub fn with_noise_amplitude(mut self, noise_amplitude: f32) -> Self {
        self.noise_amplitude = clamp_f32(
            "noise_amplitude",
            noise_amplitude,
            &NOISE_AMPLITUDE_RANGE,
            Self::default().noise_amplitude,
        );
        self
    }

    pub fn with_continent_threshold(mut self, continent_threshold: f32) -> Self {
        self.continent_threshold = clamp_f32(
            "continent_threshold",
            continent_threshold,
            &THRESHOLD_RANGE,
            Self::default().continent_threshold,
        );
        self
    }

    pub fn with_cave_threshold(mut self, cave_threshold: f32) -> Self {
        self.cave_threshold = clamp_f32(
            "cave_threshold",
            cave_threshold,
            &THRESHOLD_RANGE,
            Self::default().cave_threshold,
        );
        self
    }

    /// Returns a copy with every field clamped into its documented range.
    pub fn clamped(self) -> Self {
        WorldConfig::default()
            .with_seed(self.seed)
            .with_world_size(self.world_size)
            .with_planet_radius(self.planet_radius)
            .with_sea_level(self.sea_level)
            .with_noise_frequency(self.noise_frequency)
            .with_noise_amplitude(self.noise_amplitude)
            .with_continent_threshold(self.continent_threshold)
            .with_cave_threshold(self.cave_threshold)
    }

    /// Returns a copy that generation can always work with.
    ///
    /// The lattice size and the noise parameters are clamped into their ranges and
    /// non-finite floats fall back to their defaults. Radius and sea level are left as given
    /// so tools can build deliberately small test planets.
    pub fn sanitized(self) -> Self {
        let defaults = WorldConfig::default();
        let sea_level = if self.sea_level.is_finite() {
            self.sea_level
        } else {
            warn!("sea_level = {} is not finite, using {}", self.sea_level, defaults.sea_level);
            defaults.sea_level
        };
        WorldConfig {
            seed: self.seed,
            world_size: clamp_i32("world_size", self.world_size, &WORLD_SIZE_RANGE),
            planet_radius: self.planet_radius.max(0),
            sea_level,
            noise_frequency: clamp_f32(
                "noise_frequency",
                self.noise_frequency,
                &NOISE_FREQUENCY_RANGE,
                defaults.noise_frequency,
            ),
            noise_amplitude: clamp_f32(
                "noise_amplitude",
                self.noise_amplitude,
                &NOISE_AMPLITUDE_RANGE,
                defaults.noise_amplitude,
            ),
            continent_threshold: clamp_f32(
                "continent_threshold",
                self.continent_threshold,
                &THRESHOLD_RANGE,
                defaults.continent_threshold,
            ),
            cave_threshold: clamp_f32(
                "cave_threshold",
                self.cave_threshold,
                &THRESHOLD_RANGE,
                defaults.cave_threshold,
            ),
        }
    }

    /// Parses a config from JSON. Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
