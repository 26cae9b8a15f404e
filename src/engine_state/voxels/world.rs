//! # World Module
//!
//! This module provides the `World` struct which owns every chunk of the planet and is the
//! single gateway for block edits.
//!
//! ## Architecture
//!
//! Chunks live in a hash map keyed by their origin, the lowest corner of the chunk in block
//! coordinates. The map covers a cubic lattice of `world_size³` chunks. Neighbour lookups
//! are arithmetic on origins (`origin ± CHUNK_DIMENSION`), never pointers between chunks.
//!
//! ## Addressing
//!
//! A global block position resolves to a chunk origin by floor division of each axis and to
//! a local offset by the matching euclidean remainder. Positions outside
//! `[0, world_size * CHUNK_DIMENSION)` on any axis are outside the world: reads there
//! return Air and writes are rejected without touching any chunk.
//!
//! ## Configuration
//!
//! The world keeps two copies of [`WorldConfig`]. `config` is the editable one. The active
//! copy is taken at generation time and describes the chunks that currently exist, so
//! editing `config` never changes the built world until the next [`World::generate`].

use std::collections::{HashMap, HashSet};

use cgmath::{MetricSpace, Point3};
use log::{info, trace, warn};
use web_time::Instant;

use crate::engine_state::rendering::meshing::{BlockSource, ClipRegion, MeshBuilder};

use super::{
    block::{block_side::BlockSide, block_type::BlockKind},
    chunk::{Chunk, CHUNK_DIMENSION},
    config::WorldConfig,
    error::WorldError,
    terrain::{GenerationMode, TerrainGenerator},
};

/// The outcome of a successful [`World::set_block`].
#[derive(Debug, Clone, PartialEq)]
pub struct BlockEdit {
    /// The edited global position
    pub position: Point3<i32>,
    /// The block that was there before
    pub previous: BlockKind,
    /// Every chunk origin marked dirty by the edit, owning chunk first
    pub dirtied: Vec<Point3<i32>>,
}

/// Summary of one [`World::generate`] run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    /// Chunks populated and inserted
    pub generated: usize,
    /// Origins whose population failed; they can be retried with
    /// [`World::regenerate_chunk`]
    pub failed: Vec<Point3<i32>>,
}

/// Block and chunk counts for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub chunks: usize,
    pub dirty_chunks: usize,
    pub non_air_blocks: usize,
    pub water_blocks: usize,
}

/// Represents the voxel planet as a cubic lattice of chunks.
#[derive(Debug)]
pub struct World {
    /// Editable generation parameters, applied by the next [`World::generate`]
    pub config: WorldConfig,

    /// The parameters the current chunk set was built with.
    active: WorldConfig,

    /// The mode of the last generation, reused by [`World::regenerate_chunk`].
    mode: GenerationMode,

    /// A mapping from chunk origins to chunk data.
    chunks: HashMap<Point3<i32>, Chunk>,

    /// Split-view cutaway applied when meshing.
    clip: Option<ClipRegion>,
}

/// Sort key giving chunk snapshots a stable order.
fn origin_key(origin: &Point3<i32>) -> (i32, i32, i32) {
    (origin.x, origin.y, origin.z)
}

impl World {
    /// Creates a world with no chunks.
    ///
    /// # Arguments
    ///
    /// * `config` - Initial parameters; also used as the active config until the first
    ///   generation
    pub fn new(config: WorldConfig) -> Self {
        World {
            config,
            active: config.sanitized(),
            mode: GenerationMode::Full,
            chunks: HashMap::new(),
            clip: None,
        }
    }

    /// Creates a world whose whole lattice is filled with air chunks, already meshed.
    pub fn blank(config: WorldConfig) -> Self {
        let mut world = World::new(config);
        for origin in world.lattice_origins() {
            world.chunks.insert(origin, Chunk::empty(origin));
        }
        world.rebuild_dirty();
        world
    }

    /// The config the current chunk set was built with.
    pub fn active_config(&self) -> &WorldConfig {
        &self.active
    }

    /// Chunks along each axis of the lattice.
    pub fn world_size(&self) -> i32 {
        self.active.world_size
    }

    /// Blocks along each axis of the lattice.
    pub fn extent(&self) -> i32 {
        self.active.world_size * CHUNK_DIMENSION
    }

    /// The geometric center of the lattice; the gravity target.
    pub fn world_center(&self) -> Point3<f32> {
        let half = self.extent() as f32 / 2.0;
        Point3::new(half, half, half)
    }

    /// Returns whether a global position lies inside the world bounds.
    pub fn is_inside(&self, pos: Point3<i32>) -> bool {
        let extent = self.extent();
        (0..extent).contains(&pos.x) && (0..extent).contains(&pos.y) && (0..extent).contains(&pos.z)
    }

    /// The origin of the chunk that would own `pos`.
    pub fn chunk_origin_of(pos: Point3<i32>) -> Point3<i32> {
        Point3::new(
            pos.x.div_euclid(CHUNK_DIMENSION) * CHUNK_DIMENSION,
            pos.y.div_euclid(CHUNK_DIMENSION) * CHUNK_DIMENSION,
            pos.z.div_euclid(CHUNK_DIMENSION) * CHUNK_DIMENSION,
        )
    }

    /// The offset of `pos` inside its owning chunk, each axis in `0..CHUNK_DIMENSION`.
    pub fn local_offset(pos: Point3<i32>) -> Point3<i32> {
        Point3::new(
            pos.x.rem_euclid(CHUNK_DIMENSION),
            pos.y.rem_euclid(CHUNK_DIMENSION),
            pos.z.rem_euclid(CHUNK_DIMENSION),
        )
    }

    /// The origin of the chunk across `side` from the chunk at `origin`.
    pub fn neighbour_origin(origin: Point3<i32>, side: BlockSide) -> Point3<i32> {
        origin + side.normal() * CHUNK_DIMENSION
    }

    /// Every origin of the cubic lattice, in x, y, z nested order.
    fn lattice_origins(&self) -> Vec<Point3<i32>> {
        let size = self.world_size();
        let mut origins = Vec::with_capacity((size * size * size) as usize);
        for x in 0..size {
            for y in 0..size {
                for z in 0..size {
                    origins.push(Point3::new(x, y, z) * CHUNK_DIMENSION);
                }
            }
        }
        origins
    }

    /// Gets the block at a global position. Air outside the world or in a missing chunk.
    pub fn get_block(&self, pos: Point3<i32>) -> BlockKind {
        if !self.is_inside(pos) {
            return BlockKind::Air;
        }
        let local = Self::local_offset(pos);
        self.chunks
            .get(&Self::chunk_origin_of(pos))
            .map_or(BlockKind::Air, |chunk| chunk.get_block(local.x, local.y, local.z))
    }

    /// Writes a block and marks the owning chunk dirty.
    ///
    /// # Arguments
    ///
    /// * `pos` - The global position to write
    /// * `kind` - The new block
    /// * `propagate` - Also mark chunks across any chunk face the cell touches, since a
    ///   face there may appear or disappear
    ///
    /// # Errors
    ///
    /// Outside the world, or where no chunk is loaded. Nothing is changed in either case.
    pub fn set_block(
        &mut self,
        pos: Point3<i32>,
        kind: BlockKind,
        propagate: bool,
    ) -> Result<BlockEdit, WorldError> {
        if !self.is_inside(pos) {
            trace!("Rejected write of {} outside the world at {:?}", kind, pos);
            return Err(WorldError::OutOfBounds { position: pos });
        }

        let origin = Self::chunk_origin_of(pos);
        let local = Self::local_offset(pos);
        let chunk = self
            .chunks
            .get_mut(&origin)
            .ok_or(WorldError::ChunkNotLoaded { origin })?;
        let previous = chunk
            .set_block(local.x, local.y, local.z, kind)
            .ok_or(WorldError::OutOfBounds { position: pos })?;
        chunk.mark_dirty();

        let mut dirtied = vec![origin];
        if propagate {
            for side in BlockSide::all() {
                let n = local + side.normal();
                if Chunk::in_bounds(n.x, n.y, n.z) {
                    continue;
                }
                let neighbour = Self::neighbour_origin(origin, side);
                if self.mark_dirty(neighbour) {
                    dirtied.push(neighbour);
                }
            }
        }

        Ok(BlockEdit {
            position: pos,
            previous,
            dirtied,
        })
    }

    /// Replaces every chunk with a freshly generated lattice.
    ///
    /// The editable config is sanitized and snapshotted as the active config first. Chunks
    /// that fail to populate are skipped and reported; the rest are inserted and meshed.
    pub fn generate(&mut self, mode: GenerationMode) -> GenerationReport {
        let generator = TerrainGenerator::new(self.config.sanitized(), mode);
        self.generate_with(generator)
    }

    /// Rebuilds the lattice from `generator`, whose config becomes the active one.
    fn generate_with(&mut self, generator: TerrainGenerator) -> GenerationReport {
        let start = Instant::now();
        self.chunks.clear();
        self.active = *generator.config();
        self.mode = generator.mode();

        info!(
            "Generating {0}x{0}x{0} chunk world (seed {1}, mode {2:?})",
            self.active.world_size, self.active.seed, self.mode
        );

        let mut report = GenerationReport::default();
        for origin in self.lattice_origins() {
            match generator.populate(origin) {
                Ok(chunk) => {
                    self.chunks.insert(origin, chunk);
                    report.generated += 1;
                }
                Err(err) => {
                    warn!("Skipping chunk {:?}: {}", origin, err);
                    report.failed.push(origin);
                }
            }
        }

        self.rebuild_dirty();
        info!(
            "Generated {} chunks ({} failed) in {:?}",
            report.generated,
            report.failed.len(),
            start.elapsed()
        );
        report
    }

    /// Populates a single chunk again from the active config, replacing it if present.
    ///
    /// Used to retry a chunk that failed during [`World::generate`]. The chunk and its face
    /// neighbours are remeshed.
    pub fn regenerate_chunk(&mut self, origin: Point3<i32>) -> Result<(), WorldError> {
        if !self.is_inside(origin) || Self::chunk_origin_of(origin) != origin {
            return Err(WorldError::OutOfBounds { position: origin });
        }

        let generator = TerrainGenerator::new(self.active, self.mode);
        let chunk = generator.populate(origin)?;
        self.chunks.insert(origin, chunk);
        for side in BlockSide::all() {
            self.mark_dirty(Self::neighbour_origin(origin, side));
        }
        self.rebuild_dirty();
        Ok(())
    }

    pub fn get_chunk(&self, origin: Point3<i32>) -> Option<&Chunk> {
        self.chunks.get(&origin)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// All chunk origins, sorted.
    pub fn chunk_origins(&self) -> Vec<Point3<i32>> {
        let mut origins: Vec<_> = self.chunks.keys().copied().collect();
        origins.sort_by_key(origin_key);
        origins
    }

    /// Iterates all chunks in [`World::chunk_origins`] order.
    pub fn all_chunks(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunk_origins()
            .into_iter()
            .filter_map(move |origin| self.chunks.get(&origin))
    }

    /// Flags a chunk for remeshing. Returns false if no chunk exists at `origin`.
    pub fn mark_dirty(&mut self, origin: Point3<i32>) -> bool {
        match self.chunks.get_mut(&origin) {
            Some(chunk) => {
                chunk.mark_dirty();
                true
            }
            None => false,
        }
    }

    /// Origins of every dirty chunk, sorted.
    pub fn dirty_chunks(&self) -> Vec<Point3<i32>> {
        let mut origins: Vec<_> = self
            .chunks
            .values()
            .filter(|chunk| chunk.is_dirty())
            .map(|chunk| chunk.origin)
            .collect();
        origins.sort_by_key(origin_key);
        origins
    }

    /// Rebuilds one chunk's geometry from scratch and clears its dirty flag.
    ///
    /// Returns false if no chunk exists at `origin`.
    pub fn rebuild_mesh(&mut self, origin: Point3<i32>) -> bool {
        let Some(chunk) = self.chunks.get(&origin) else {
            return false;
        };
        let mesh = MeshBuilder::new(&*self, self.clip).build(chunk);
        if let Some(chunk) = self.chunks.get_mut(&origin) {
            chunk.install_mesh(mesh);
        }
        true
    }

    /// Rebuilds each of `origins` once, ignoring duplicates and missing chunks.
    ///
    /// # Returns
    /// The origins that were rebuilt, sorted.
    pub fn rebuild_chunks(&mut self, origins: impl IntoIterator<Item = Point3<i32>>) -> Vec<Point3<i32>> {
        let unique: HashSet<_> = origins.into_iter().collect();
        let mut rebuilt: Vec<_> = unique
            .into_iter()
            .filter(|origin| self.rebuild_mesh(*origin))
            .collect();
        rebuilt.sort_by_key(origin_key);
        rebuilt
    }

    /// Rebuilds every dirty chunk.
    pub fn rebuild_dirty(&mut self) -> Vec<Point3<i32>> {
        let dirty = self.dirty_chunks();
        self.rebuild_chunks(dirty)
    }

    pub fn clip(&self) -> Option<ClipRegion> {
        self.clip
    }

    /// Sets or clears the split-view cutaway. Any change marks every chunk dirty.
    pub fn set_clip(&mut self, clip: Option<ClipRegion>) {
        if self.clip == clip {
            return;
        }
        self.clip = clip;
        for chunk in self.chunks.values_mut() {
            chunk.mark_dirty();
        }
    }

    pub fn stats(&self) -> WorldStats {
        self.chunks.values().fold(
            WorldStats {
                chunks: self.chunks.len(),
                ..WorldStats::default()
            },
            |mut stats, chunk| {
                stats.dirty_chunks += usize::from(chunk.is_dirty());
                stats.water_blocks += chunk.count(BlockKind::Water);
                stats.non_air_blocks += chunk.raw_blocks().len() - chunk.count(BlockKind::Air);
                stats
            },
        )
    }

    /// Writes `kind` into every cell within `radius` of `center`.
    ///
    /// Cells outside the world are skipped. When digging (`kind` is Air), indestructible
    /// blocks are left in place.
    ///
    /// # Returns
    /// The number of cells that changed.
    pub fn fill_sphere(&mut self, center: Point3<i32>, radius: f32, kind: BlockKind) -> usize {
        if !radius.is_finite() || radius < 0.0 {
            return 0;
        }
        // Only the part of the bounding box inside the world is visited.
        let reach = f64::from(radius).ceil() as i64;
        let extent = i64::from(self.extent());
        let span = |c: i32| {
            let c = i64::from(c);
            let lo = c.saturating_sub(reach).max(0);
            let hi = c.saturating_add(reach).min(extent - 1);
            // Both bounds lie in [0, extent) when the range is non-empty.
            lo as i32..=hi as i32
        };
        let centre_f = Point3::new(f64::from(center.x), f64::from(center.y), f64::from(center.z));
        let radius = f64::from(radius);
        let mut changed = 0;

        for x in span(center.x) {
            for y in span(center.y) {
                for z in span(center.z) {
                    let pos = Point3::new(x, y, z);
                    let pos_f = Point3::new(f64::from(x), f64::from(y), f64::from(z));
                    if pos_f.distance(centre_f) > radius {
                        continue;
                    }
                    let current = self.get_block(pos);
                    if current == kind || (kind == BlockKind::Air && current.is_indestructible()) {
                        continue;
                    }
                    if self.set_block(pos, kind, true).is_ok() {
                        changed += 1;
                    }
                }
            }
        }
        changed
    }
}

impl BlockSource for World {
    fn block_at(&self, global: Point3<i32>) -> BlockKind {
        self.get_block(global)
    }
}
