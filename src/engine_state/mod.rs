//! # Engine State Module
//!
//! The core engine module that owns the voxel planet and drives it on a fixed schedule.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns the world and the simulator and decides when each runs
//! * `voxels` - Block catalog, chunk storage, the world and terrain generation
//! * `rendering` - Surface geometry built from block data
//! * `simulation` - Radial gravity and fluid ticks
//!
//! ## Architecture
//!
//! Nothing runs implicitly. The caller generates the world and then feeds elapsed time to
//! [`EngineState::step`], which runs as many whole simulation ticks as fit into the
//! accumulated time. Every pass runs to completion before the next one starts.

use log::{debug, info};
use web_time::{Duration, Instant};

use rendering::meshing::ClipRegion;
use simulation::{GravitySimulator, TickReport};
use voxels::{
    config::WorldConfig,
    terrain::GenerationMode,
    world::{GenerationReport, World},
};

pub mod rendering;
pub mod simulation;
pub mod voxels;

/// Default time between simulation ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Upper bound on ticks run by a single [`EngineState::step`]. Time beyond it is dropped.
pub const MAX_TICKS_PER_STEP: u32 = 5;

/// Mixed into the world seed to derive the default simulation seed.
const SIMULATION_SEED_SALT: u64 = 0x5EED_0F_6A_7F17;

/// Flags controlling engine behavior
#[derive(Debug, Default, Clone, Copy)]
pub struct EngineFlags {
    /// Whether simulation ticks are suspended
    pub simulation_paused: bool,
}

/// The main state container for the voxel engine.
///
/// # Examples
///
/// ```
/// use voxel_planet::{EngineState, GenerationMode, WorldConfig};
/// use web_time::Duration;
///
/// let mut engine = EngineState::new(WorldConfig::default().with_world_size(1));
/// engine.generate(GenerationMode::ShapeOnly);
/// let reports = engine.step(Duration::from_millis(450));
/// assert_eq!(reports.len(), 2);
/// ```
#[derive(Debug)]
pub struct EngineState {
    /// The voxel world containing all chunk data
    world: World,
    /// Gravity and fluid simulation with its own random stream
    simulator: GravitySimulator,
    /// Time between simulation ticks
    tick_interval: Duration,
    /// Elapsed time not yet consumed by ticks
    accumulator: Duration,
    /// Engine configuration flags
    pub flags: EngineFlags,
}

impl EngineState {
    /// Creates an engine with an empty world.
    ///
    /// The simulation seed is derived from `config.seed`; use
    /// [`EngineState::with_simulation_seed`] to choose it explicitly.
    pub fn new(config: WorldConfig) -> Self {
        let simulation_seed = config.seed ^ SIMULATION_SEED_SALT;
        Self::with_simulation_seed(config, simulation_seed)
    }

    /// Creates an engine with an empty world and an explicit simulation seed.
    ///
    /// # Arguments
    ///
    /// * `config` - World generation parameters
    /// * `simulation_seed` - Seed for the simulator's random choices only
    pub fn with_simulation_seed(config: WorldConfig, simulation_seed: u64) -> Self {
        EngineState {
            world: World::new(config),
            simulator: GravitySimulator::new(simulation_seed),
            tick_interval: DEFAULT_TICK_INTERVAL,
            accumulator: Duration::ZERO,
            flags: EngineFlags::default(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Changes the tick interval. A zero interval is ignored.
    pub fn set_tick_interval(&mut self, interval: Duration) {
        if interval.is_zero() {
            return;
        }
        self.tick_interval = interval;
    }

    /// Regenerates the world from its editable config and discards pending tick time.
    pub fn generate(&mut self, mode: GenerationMode) -> GenerationReport {
        self.accumulator = Duration::ZERO;
        self.world.generate(mode)
    }

    /// Sets the split-view cutaway and remeshes every chunk.
    pub fn set_clip(&mut self, clip: Option<ClipRegion>) {
        let start = Instant::now();
        self.world.set_clip(clip);
        let rebuilt = self.world.rebuild_dirty();
        info!("Applied clip {:?} to {} chunks in {:?}", clip, rebuilt.len(), start.elapsed());
    }

    /// Runs one simulation tick immediately, regardless of the schedule.
    pub fn tick(&mut self) -> TickReport {
        self.simulator.tick(&mut self.world)
    }

    /// Advances the schedule by `elapsed`.
    ///
    /// # Returns
    ///
    /// One report per tick that ran, in order. Empty while paused or before a full
    /// interval has accumulated.
    pub fn step(&mut self, elapsed: Duration) -> Vec<TickReport> {
        if self.flags.simulation_paused {
            return Vec::new();
        }

        self.accumulator += elapsed;
        let mut reports = Vec::new();
        while self.accumulator >= self.tick_interval {
            if reports.len() as u32 == MAX_TICKS_PER_STEP {
                debug!("Dropping {:?} of simulation backlog", self.accumulator);
                self.accumulator = Duration::ZERO;
                break;
            }
            self.accumulator -= self.tick_interval;
            reports.push(self.tick());
        }
        reports
    }

    /// Number of ticks run since the engine was created.
    pub fn ticks(&self) -> u64 {
        self.simulator.ticks()
    }
}
