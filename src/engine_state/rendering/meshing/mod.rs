//! Mesh generation and management for voxel rendering.
//!
//! This module turns chunk block data into renderable surface geometry. The key goals are:
//! 1. Draw only the faces that can be seen, including across chunk seams
//! 2. Keep water in its own triangle group so it can be drawn translucent
//! 3. Rebuild a chunk's geometry wholesale from its current blocks, with no caching
//!
//! # Architecture
//! - [`MeshBuilder`]: Entry point, binds a neighbour lookup and an optional cutaway
//! - [`BlockSource`]: Global block lookups used at chunk boundaries
//! - [`ClipRegion`]: Half-space cutaway used for split views
//! - `mesh/`: Contains the face-culling algorithm and the mesh data structures

use cgmath::Point3;
use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::{block::block_type::BlockKind, chunk::Chunk};

/// Face culling and mesh data structures.
mod mesh;

// Re-export the mesh module's public interface for external use
pub use mesh::*;

/// Read access to blocks by global position.
///
/// Implementations must return Air for any position they do not hold.
pub trait BlockSource {
    fn block_at(&self, global: Point3<i32>) -> BlockKind;
}

/// A world axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// The component of `p` along this axis.
    pub fn component(self, p: Point3<i32>) -> i32 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
            Axis::Z => p.z,
        }
    }
}

/// A half-space cutaway for split views.
///
/// Blocks inside the clipped half are not drawn, and faces next to them are drawn as if
/// they bordered Air, so the cut shows a solid cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipRegion {
    /// The axis the cutting plane is perpendicular to
    pub axis: Axis,
    /// The first coordinate on the far side of the plane
    pub threshold: i32,
    /// When true, coordinates below `threshold` stay visible; otherwise the ones at or above
    pub keep_below: bool,
}

impl ClipRegion {
    pub fn new(axis: Axis, threshold: i32, keep_below: bool) -> Self {
        ClipRegion {
            axis,
            threshold,
            keep_below,
        }
    }

    /// Returns whether the block at `global` is cut away.
    pub fn clips(&self, global: Point3<i32>) -> bool {
        let c = self.axis.component(global);
        if self.keep_below {
            c >= self.threshold
        } else {
            c < self.threshold
        }
    }
}

/// Builds chunk meshes against a fixed view of the surrounding blocks.
///
/// A builder borrows its [`BlockSource`] immutably, so the neighbour blocks it sees cannot
/// change while a batch of chunks is being meshed.
pub struct MeshBuilder<'a, S: BlockSource + ?Sized> {
    /// Lookups for blocks outside the chunk being meshed
    source: &'a S,
    /// Optional cutaway applied to every chunk
    clip: Option<ClipRegion>,
}

impl<'a, S: BlockSource + ?Sized> MeshBuilder<'a, S> {
    /// Creates a new builder.
    ///
    /// # Arguments
    ///
    /// * `source` - Global lookups for neighbours across chunk seams
    /// * `clip` - Optional split-view cutaway
    pub fn new(source: &'a S, clip: Option<ClipRegion>) -> Self {
        MeshBuilder { source, clip }
    }

    /// Builds the full geometry of one chunk. See [`culled`] for the culling rules.
    pub fn build(&self, chunk: &Chunk) -> ChunkMesh {
        culled(chunk, self.source, self.clip.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_region_splits_on_threshold() {
        let keep_low = ClipRegion::new(Axis::Y, 10, true);
        assert!(!keep_low.clips(Point3::new(0, 9, 0)));
        assert!(keep_low.clips(Point3::new(0, 10, 0)));

        let keep_high = ClipRegion::new(Axis::Z, 10, false);
        assert!(keep_high.clips(Point3::new(50, 50, 9)));
        assert!(!keep_high.clips(Point3::new(0, 0, 10)));
    }
}
