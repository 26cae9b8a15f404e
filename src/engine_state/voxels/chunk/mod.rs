//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size cube of block kinds anchored at
//! an integer world-space origin.
//!
//! ## Storage
//!
//! Blocks are stored densely, one [`BlockKind`] byte per cell, in x-fastest order
//! (`x + y * CHUNK_DIMENSION + z * CHUNK_PLANE_SIZE`). A 16³ chunk therefore occupies
//! 4 KiB of block data and every read or write is O(1).
//!
//! ## Ownership
//!
//! Chunks are created by the world during generation and owned by it afterwards. The
//! only mutation path for the rest of the engine is the world's block-write API, which
//! keeps the `dirty` flag honest. The chunk also keeps the most recently built
//! [`ChunkMesh`] so mesh state lives next to the block state it was derived from.

use cgmath::Point3;

use super::block::block_type::BlockKind;
use crate::engine_state::rendering::meshing::ChunkMesh;
use chunk_iteration::ChunkBlockIterator;

pub mod chunk_iteration;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;

/// Represents a 16x16x16 collection of voxel blocks in the world.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// The lowest corner of this chunk in block coordinates. Always a multiple of
    /// [`CHUNK_DIMENSION`] on every axis.
    pub origin: Point3<i32>,

    /// Dense block grid, see the module docs for the index layout.
    blocks: Vec<BlockKind>,

    /// Set when the block grid changed after the mesh was last built.
    dirty: bool,

    /// Geometry built from the block grid by the mesher.
    mesh: ChunkMesh,
}

impl Chunk {
    /// Creates a chunk at `origin` filled with air.
    ///
    /// New chunks start dirty because they have never been meshed.
    pub fn empty(origin: Point3<i32>) -> Self {
        Self::filled(origin, BlockKind::Air)
    }

    /// Creates a chunk at `origin` with every cell set to `kind`.
    pub fn filled(origin: Point3<i32>, kind: BlockKind) -> Self {
        Chunk {
            origin,
            blocks: vec![kind; CHUNK_SIZE as usize],
            dirty: true,
            mesh: ChunkMesh::default(),
        }
    }

    /// Returns whether the local coordinate lies inside the chunk.
    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_DIMENSION).contains(&x)
            && (0..CHUNK_DIMENSION).contains(&y)
            && (0..CHUNK_DIMENSION).contains(&z)
    }

    fn index(x: i32, y: i32, z: i32) -> usize {
        (x + y * CHUNK_DIMENSION + z * CHUNK_PLANE_SIZE) as usize
    }

    /// Gets the block at the chunk-relative coordinates, or Air when out of bounds.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockKind {
        if Self::in_bounds(x, y, z) {
            self.blocks[Self::index(x, y, z)]
        } else {
            BlockKind::Air
        }
    }

    /// Sets the block at the chunk-relative coordinates.
    ///
    /// Returns the previous block, or `None` (and changes nothing) when out of bounds.
    /// This does not touch the dirty flag; the world decides what needs remeshing.
    pub(crate) fn set_block(&mut self, x: i32, y: i32, z: i32, kind: BlockKind) -> Option<BlockKind> {
        if !Self::in_bounds(x, y, z) {
            return None;
        }
        let index = Self::index(x, y, z);
        Some(std::mem::replace(&mut self.blocks[index], kind))
    }

    /// Overwrites every cell with `kind`.
    pub(crate) fn fill(&mut self, kind: BlockKind) {
        self.blocks.fill(kind);
        self.dirty = true;
    }

    /// Iterates every cell as `(local position, kind)` in x, y, z nested order.
    pub fn iter_blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }

    /// Counts the cells holding `kind`.
    pub fn count(&self, kind: BlockKind) -> usize {
        self.blocks.iter().filter(|b| **b == kind).count()
    }

    /// Returns true if every cell is air.
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| *b == BlockKind::Air)
    }

    /// The raw block grid, in storage order.
    pub fn raw_blocks(&self) -> &[BlockKind] {
        &self.blocks
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// The geometry from the last rebuild.
    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    /// Replaces the geometry wholesale and clears the dirty flag.
    pub(crate) fn install_mesh(&mut self, mesh: ChunkMesh) {
        self.mesh = mesh;
        self.dirty = false;
    }

    /// Converts a chunk-relative coordinate into a global block coordinate.
    pub fn to_global(&self, x: i32, y: i32, z: i32) -> Point3<i32> {
        Point3::new(self.origin.x + x, self.origin.y + y, self.origin.z + z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_reads_are_air_and_writes_are_ignored() {
        let mut chunk = Chunk::filled(Point3::new(0, 0, 0), BlockKind::Stone);
        assert_eq!(chunk.get_block(-1, 0, 0), BlockKind::Air);
        assert_eq!(chunk.get_block(0, CHUNK_DIMENSION, 0), BlockKind::Air);
        assert_eq!(chunk.set_block(0, 0, CHUNK_DIMENSION, BlockKind::Sand), None);
        assert_eq!(chunk.count(BlockKind::Stone), CHUNK_SIZE as usize);
    }

    #[test]
    fn set_block_returns_previous_kind() {
        let mut chunk = Chunk::empty(Point3::new(16, 0, 32));
        assert_eq!(chunk.set_block(3, 4, 5, BlockKind::Sand), Some(BlockKind::Air));
        assert_eq!(chunk.set_block(3, 4, 5, BlockKind::Dirt), Some(BlockKind::Sand));
        assert_eq!(chunk.get_block(3, 4, 5), BlockKind::Dirt);
        assert_eq!(chunk.to_global(3, 4, 5), Point3::new(19, 4, 37));
    }

    #[test]
    fn installing_a_mesh_clears_dirty() {
        let mut chunk = Chunk::empty(Point3::new(0, 0, 0));
        assert!(chunk.is_dirty());
        chunk.install_mesh(ChunkMesh::default());
        assert!(!chunk.is_dirty());
        chunk.fill(BlockKind::Water);
        assert!(chunk.is_dirty());
        assert!(!chunk.is_empty());
    }
}
