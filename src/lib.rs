#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Planet
//!
//! A spherical, chunked voxel world engine.
//!
//! This crate stores block data for a small planet, fills it procedurally from seeded
//! noise, rebuilds flat-colored surface geometry from the blocks and runs a discrete
//! gravity pass that pulls loose material and water towards the planet center.
//!
//! ## Key Modules
//!
//! * `engine_state::voxels` - Block catalog, chunks, the world and terrain generation
//! * `engine_state::rendering` - Face-culled chunk meshes, split into opaque and water
//! * `engine_state::simulation` - Radial gravity and fluid ticks
//!
//! ## Architecture
//!
//! One [`World`] owns every chunk and is the only way blocks change. Terrain generation,
//! meshing and simulation are synchronous passes over it, driven explicitly by an
//! [`EngineState`] instead of per-frame callbacks.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     voxel_planet::run();
//! }
//! ```

use log::{info, warn};
use web_time::Duration;

pub mod engine_state;

pub use engine_state::{
    rendering::{
        meshing::{Axis, BlockSource, ChunkMesh, ClipRegion, Face, MeshBuilder},
        Vertex,
    },
    simulation::{radial_down, GravitySimulator, TickReport},
    voxels::{
        block::{block_side::BlockSide, block_type::BlockKind},
        chunk::{Chunk, CHUNK_DIMENSION},
        config::WorldConfig,
        error::{ConfigError, GenerationError, WorldError},
        terrain::{GenerationMode, TerrainGenerator},
        world::{BlockEdit, GenerationReport, World, WorldStats},
    },
    EngineState,
};

/// Environment variable naming an optional JSON config file for [`run`].
pub const CONFIG_ENV_VAR: &str = "VOXEL_PLANET_CONFIG";

/// Simulated time [`run`] advances the schedule by.
pub const DEMO_DURATION: Duration = Duration::from_secs(5);

/// Loads the config named by [`CONFIG_ENV_VAR`], clamped into range.
///
/// Falls back to the defaults if the variable is unset or the file cannot be used.
pub fn load_config() -> WorldConfig {
    let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
        return WorldConfig::default();
    };
    match WorldConfig::from_json_file(&path) {
        Ok(config) => {
            info!("Loaded config from {}", path);
            config.clamped()
        }
        Err(err) => {
            warn!("Ignoring config {}: {}", path, err);
            WorldConfig::default()
        }
    }
}

/// Generates a planet, lets it settle for a few seconds of simulated time and logs the
/// result.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let mut engine = EngineState::new(load_config());
    let report = engine.generate(GenerationMode::Full);
    if !report.failed.is_empty() {
        warn!("{} chunks failed to generate", report.failed.len());
    }

    let mut moves = 0;
    let mut remaining = DEMO_DURATION;
    while !remaining.is_zero() {
        let slice = remaining.min(engine.tick_interval());
        moves += engine
            .step(slice)
            .iter()
            .map(TickReport::total_moves)
            .sum::<usize>();
        remaining -= slice;
    }

    let stats = engine.world().stats();
    info!(
        "{} ticks, {} block moves; {} chunks, {} solid or water blocks, {} water",
        engine.ticks(),
        moves,
        stats.chunks,
        stats.non_air_blocks,
        stats.water_blocks
    );
}
