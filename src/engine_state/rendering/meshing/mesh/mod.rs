//! Mesh generation for voxel chunks.
//!
//! This module converts chunk block data into flat-colored surface geometry.
//!
//! # Architecture
//! - [`ChunkMesh`]: Positions, colors and the opaque and water index groups of one chunk
//! - [`Face`]: A single quad on one side of one block
//! - [`culled`]: The per-face visibility pass that produces a `ChunkMesh`

mod culled;
mod face;
mod mesh;

pub use culled::{culled, face_visible};
pub use face::Face;
pub use mesh::*;
