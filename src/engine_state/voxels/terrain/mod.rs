//! # Terrain Generation Module
//!
//! This module fills chunks so the world looks like a small planet. Every cell is a pure
//! function of its global position, the world config and the seed, so chunks can be built
//! in any order and a regeneration with the same inputs reproduces the same grid.
//!
//! ## Algorithm
//!
//! For each cell, in order:
//! 1. Measure the distance from the cell to the world center.
//! 2. Classify the (x, z) column as land or ocean plate from the continent layer.
//! 3. Land rises by a ridged term plus a small base term, ocean sinks with plate depth.
//! 4. Cells within `planet_radius + elevation` of the center are solid.
//! 5. Solid cells may be hollowed into caves, outside the inner core only.
//! 6. Remaining solids are layered into shells: magma core, bedrock mantle, stone crust,
//!    a few blocks of dirt and a biome-selected surface.
//! 7. Open cells hold water up to `sea_level` and air above it.
//!
//! The mantle's scattered magma comes from a per-cell random draw seeded by the world
//! seed and the position. It is independent of any other random stream in the engine.

use cgmath::{MetricSpace, Point3};
use log::debug;
use web_time::Instant;

use super::{
    block::block_type::BlockKind,
    chunk::{Chunk, CHUNK_DIMENSION},
    config::WorldConfig,
    error::GenerationError,
};
use noise_layers::NoiseLayers;

pub mod noise_layers;

/// Ridge values above this mark a column as mountain.
pub const MOUNTAIN_RIDGE_THRESHOLD: f32 = 0.6;
/// Weight of the base-height term relative to the ridge term.
pub const BASE_HEIGHT_WEIGHT: f32 = 0.25;
/// Ocean floors sink by at most this fraction of the noise amplitude.
pub const OCEAN_DEPTH_SCALE: f32 = 0.5;
/// Caves never open within this distance of the center.
pub const CAVE_CORE_EXCLUSION: f32 = 10.0;
/// Fraction of `planet_radius` occupied by the magma core.
pub const CORE_FRACTION: f32 = 0.2;
/// Fraction of `planet_radius` out to which the bedrock mantle reaches.
pub const MANTLE_FRACTION: f32 = 0.45;
/// Chance that a mantle cell is magma rather than bedrock.
pub const MANTLE_MAGMA_CHANCE: f32 = 0.08;
/// Thickness of the biome-selected surface layer.
pub const SURFACE_DEPTH: f32 = 2.0;
/// Depth below the surface down to which the crust is dirt.
pub const SOIL_DEPTH: f32 = 5.0;
/// Cells closer than this above sea level are beach.
pub const BEACH_HEIGHT: f32 = 1.0;

/// Which generation passes run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationMode {
    /// Shape, elevation noise, caves and biomes.
    #[default]
    Full,
    /// The bare sphere: no elevation noise and no caves. Used for fast previews.
    ShapeOnly,
    /// Noise applied over the shape. Currently identical to `Full`.
    Terrain,
}

impl GenerationMode {
    /// Whether noise-driven elevation, caves and biomes are evaluated.
    pub fn uses_noise(self) -> bool {
        !matches!(self, GenerationMode::ShapeOnly)
    }
}

/// Elevation data for one (x, z) column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSample {
    /// Signed offset of the surface from `planet_radius`
    pub elevation: f32,
    /// Whether the column is land rather than ocean plate
    pub land: bool,
    /// Whether the ridge term is high enough to count as mountain
    pub mountain: bool,
}

/// Builds chunk contents from a copy of the world config.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    config: WorldConfig,
    mode: GenerationMode,
    center: Point3<f32>,
    layers: NoiseLayers,
}

impl TerrainGenerator {
    /// Creates a generator.
    ///
    /// # Arguments
    /// * `config` - Copied in; later edits to the caller's config have no effect
    /// * `mode` - Which passes to run
    pub fn new(config: WorldConfig, mode: GenerationMode) -> Self {
        let half = (config.world_size * CHUNK_DIMENSION) as f32 / 2.0;
        TerrainGenerator {
            layers: NoiseLayers::new(config.seed, f64::from(config.noise_frequency)),
            config,
            mode,
            center: Point3::new(half, half, half),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    /// The point all shells are measured from.
    pub fn center(&self) -> Point3<f32> {
        self.center
    }

    fn sample(
        &self,
        layer: &noise_layers::NoiseLayer,
        a: i32,
        b: i32,
        position: Point3<i32>,
    ) -> Result<f32, GenerationError> {
        let value = layer.sample(f64::from(a), f64::from(b));
        if value.is_finite() {
            Ok(value as f32)
        } else {
            Err(GenerationError::NonFiniteSample {
                position,
                layer: layer.name,
            })
        }
    }

    /// Evaluates the surface elevation of the column through `position`.
    pub fn column_at(&self, position: Point3<i32>) -> Result<ColumnSample, GenerationError> {
        if !self.mode.uses_noise() {
            return Ok(ColumnSample {
                elevation: 0.0,
                land: true,
                mountain: false,
            });
        }

        let (x, z) = (position.x, position.z);
        let amplitude = self.config.noise_amplitude;
        let threshold = self.config.continent_threshold;
        let continent = self.sample(&self.layers.continent, x, z, position)?;

        if continent > threshold {
            // Fold around the midpoint so ridgelines form where the raw noise crosses 0.5.
            let raw = self.sample(&self.layers.ridge, x, z, position)?;
            let ridge = (1.0 - (2.0 * raw - 1.0).abs()).powi(2);
            let base = self.sample(&self.layers.base, x, z, position)?;
            Ok(ColumnSample {
                elevation: amplitude * (ridge + BASE_HEIGHT_WEIGHT * base),
                land: true,
                mountain: ridge > MOUNTAIN_RIDGE_THRESHOLD,
            })
        } else {
            let depth = ((threshold - continent) / threshold.max(f32::EPSILON)).clamp(0.0, 1.0);
            Ok(ColumnSample {
                elevation: -amplitude * depth * OCEAN_DEPTH_SCALE,
                land: false,
                mountain: false,
            })
        }
    }

    /// Water below sea level, air above.
    fn open_cell(&self, dist: f32) -> BlockKind {
        if dist <= self.config.sea_level {
            BlockKind::Water
        } else {
            BlockKind::Air
        }
    }

    fn surface_block(
        &self,
        position: Point3<i32>,
        dist: f32,
        column: &ColumnSample,
    ) -> Result<BlockKind, GenerationError> {
        if dist < self.config.sea_level + BEACH_HEIGHT {
            return Ok(BlockKind::Sand);
        }
        if !self.mode.uses_noise() {
            return Ok(BlockKind::Grass);
        }
        if column.mountain {
            return Ok(BlockKind::Snow);
        }

        let (x, z) = (position.x, position.z);
        let temperature = self.sample(&self.layers.temperature, x, z, position)?;
        let climate = if temperature < 0.3 {
            BlockKind::Snow
        } else if temperature > 0.7 {
            BlockKind::Sand
        } else {
            BlockKind::Grass
        };

        let patch = self.sample(&self.layers.patch, x, z, position)?;
        Ok(if patch > 0.88 {
            BlockKind::Gravel
        } else if patch > 0.8 {
            BlockKind::Clay
        } else if patch > 0.72 {
            BlockKind::Dirt
        } else {
            climate
        })
    }

    /// Returns the generated block at a global position.
    ///
    /// # Errors
    /// [`GenerationError::NonFiniteSample`] if any noise layer degenerates, which only
    /// happens with non-finite config values.
    pub fn block_at(&self, position: Point3<i32>) -> Result<BlockKind, GenerationError> {
        let dist = position.cast::<f32>().map_or(f32::NAN, |p| p.distance(self.center));
        let column = self.column_at(position)?;
        let surface_radius = self.config.planet_radius as f32 + column.elevation;

        if dist > surface_radius {
            return Ok(self.open_cell(dist));
        }

        if self.mode.uses_noise() && dist > CAVE_CORE_EXCLUSION {
            let cave_a = self.sample(&self.layers.cave_a, position.x, position.y, position)?;
            let cave_b = self.sample(&self.layers.cave_b, position.y, position.z, position)?;
            if cave_a * cave_b > self.config.cave_threshold {
                return Ok(self.open_cell(dist));
            }
        }

        let radius = self.config.planet_radius as f32;
        Ok(if dist < radius * CORE_FRACTION {
            BlockKind::Magma
        } else if dist < radius * MANTLE_FRACTION {
            if self.mantle_draw(position) < MANTLE_MAGMA_CHANCE {
                BlockKind::Magma
            } else {
                BlockKind::Bedrock
            }
        } else if dist > surface_radius - SURFACE_DEPTH {
            self.surface_block(position, dist, &column)?
        } else if dist > surface_radius - SOIL_DEPTH {
            BlockKind::Dirt
        } else {
            BlockKind::Stone
        })
    }

    /// A uniform draw in `[0, 1)` that depends only on the seed and the position.
    fn mantle_draw(&self, position: Point3<i32>) -> f32 {
        let mut h = self.config.seed ^ 0x9E37_79B9_7F4A_7C15;
        for c in [position.x, position.y, position.z] {
            h = (h ^ u64::from(c as u32)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            h ^= h >> 31;
        }
        fastrand::Rng::with_seed(h).f32()
    }

    /// Builds a fully populated chunk at `origin`.
    ///
    /// Cells are evaluated in x, y, z nested order. On error nothing is returned, so a
    /// half-filled chunk can never be observed.
    pub fn populate(&self, origin: Point3<i32>) -> Result<Chunk, GenerationError> {
        let start = Instant::now();
        let mut chunk = Chunk::empty(origin);

        for x in 0..CHUNK_DIMENSION {
            for y in 0..CHUNK_DIMENSION {
                for z in 0..CHUNK_DIMENSION {
                    let kind = self.block_at(chunk.to_global(x, y, z))?;
                    if kind != BlockKind::Air {
                        chunk.set_block(x, y, z, kind);
                    }
                }
            }
        }

        debug!("Populated chunk {:?} in {:?}", origin, start.elapsed());
        Ok(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_config() -> WorldConfig {
        WorldConfig {
            world_size: 1,
            planet_radius: 6,
            sea_level: 8.0,
            noise_amplitude: 0.0,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn zero_amplitude_gives_a_perfect_sphere() {
        let generator = TerrainGenerator::new(flat_config(), GenerationMode::Full);
        let center = generator.center();
        let chunk = generator.populate(Point3::new(0, 0, 0)).unwrap();

        for (local, kind) in chunk.iter_blocks() {
            let dist = local.cast::<f32>().unwrap().distance(center);
            if dist <= 6.0 {
                assert!(kind.is_solid(), "{:?} at {:?} should be solid", kind, local);
            } else if dist <= 8.0 {
                assert_eq!(kind, BlockKind::Water, "at {:?}", local);
            } else {
                assert_eq!(kind, BlockKind::Air, "at {:?}", local);
            }
        }
    }

    #[test]
    fn shells_follow_the_radius() {
        let config = WorldConfig {
            world_size: 4,
            planet_radius: 24,
            sea_level: 20.0,
            noise_amplitude: 0.0,
            ..WorldConfig::default()
        };
        let generator = TerrainGenerator::new(config, GenerationMode::ShapeOnly);
        let at = |dx: i32| generator.block_at(Point3::new(32 + dx, 32, 32)).unwrap();

        assert_eq!(at(0), BlockKind::Magma);
        assert!(matches!(at(6), BlockKind::Bedrock | BlockKind::Magma));
        assert_eq!(at(15), BlockKind::Stone);
        assert_eq!(at(20), BlockKind::Dirt);
        assert_eq!(at(23), BlockKind::Grass);
        assert_eq!(at(25), BlockKind::Air);
    }

    #[test]
    fn same_inputs_give_identical_chunks() {
        let config = WorldConfig::default().with_seed(1234).with_world_size(2);
        let a = TerrainGenerator::new(config, GenerationMode::Full);
        let b = TerrainGenerator::new(config, GenerationMode::Full);
        let origin = Point3::new(16, 16, 0);
        assert_eq!(
            a.populate(origin).unwrap().raw_blocks(),
            b.populate(origin).unwrap().raw_blocks()
        );
    }

    #[test]
    fn non_finite_frequency_is_reported() {
        let config = WorldConfig {
            noise_frequency: f32::NAN,
            continent_threshold: 0.0,
            ..WorldConfig::default()
        };
        let generator = TerrainGenerator::new(config, GenerationMode::Full);
        let err = generator.block_at(Point3::new(3, 40, 5)).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::NonFiniteSample { layer: "ridge", .. }
        ));
    }
}
