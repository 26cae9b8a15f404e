//! Face-culled meshing for voxel chunks.
//!
//! Every non-air block contributes one quad per side whose neighbour lets that side be
//! seen. Neighbours outside the chunk are resolved through a [`BlockSource`], so faces on
//! chunk seams are culled against the real adjacent blocks.
//!
//! Culling rules:
//! - Water draws a side only against Air. Water-water and water-solid sides are hidden.
//! - Any other block draws a side against a transparent neighbour (Air or Water).
//! - A neighbour removed by the [`ClipRegion`] counts as Air, which exposes the
//!   cross-section. Clipped blocks themselves are not drawn.

use cgmath::{Point3, Vector3};
use log::debug;
use web_time::Instant;

use crate::engine_state::{
    rendering::meshing::{BlockSource, ClipRegion},
    voxels::{
        block::{block_side::BlockSide, block_type::BlockKind},
        chunk::Chunk,
    },
};

use super::{face::Face, mesh::ChunkMesh};

/// Returns whether a block of `kind` shows its side towards `neighbor`.
pub fn face_visible(kind: BlockKind, neighbor: BlockKind) -> bool {
    if kind.is_fluid() {
        neighbor == BlockKind::Air
    } else {
        neighbor.is_transparent()
    }
}

/// Builds the complete surface geometry of `chunk`.
///
/// # Arguments
/// * `chunk` - The chunk to mesh
/// * `source` - Global block lookups for neighbours across the chunk boundary
/// * `clip` - Optional cutaway; blocks inside it are treated as Air
///
/// # Returns
/// A freshly built [`ChunkMesh`]. Nothing from a previous build is reused.
pub fn culled<S: BlockSource + ?Sized>(
    chunk: &Chunk,
    source: &S,
    clip: Option<&ClipRegion>,
) -> ChunkMesh {
    let start = Instant::now();
    let mut mesh = ChunkMesh::new();
    let is_clipped = |global: Point3<i32>| clip.is_some_and(|c| c.clips(global));

    for (local, kind) in chunk.iter_blocks() {
        if kind == BlockKind::Air {
            continue;
        }
        let global = chunk.to_global(local.x, local.y, local.z);
        if is_clipped(global) {
            continue;
        }

        for side in BlockSide::all() {
            let normal: Vector3<i32> = side.normal();
            let n = local + normal;
            let neighbor_global = global + normal;

            let mut neighbor = if Chunk::in_bounds(n.x, n.y, n.z) {
                chunk.get_block(n.x, n.y, n.z)
            } else {
                source.block_at(neighbor_global)
            };
            if is_clipped(neighbor_global) {
                neighbor = BlockKind::Air;
            }

            if face_visible(kind, neighbor) {
                mesh.push_face(&Face::new(local.x, local.y, local.z, kind, side));
            }
        }
    }

    debug!(
        "Meshed chunk {:?}: {} vertices in {:?}",
        chunk.origin,
        mesh.vertex_count(),
        start.elapsed()
    );

    mesh
}
