//! Rendering-side data for the voxel engine.
//!
//! This module converts block data into backend-neutral surface geometry. It does not
//! talk to any graphics API: a chunk's [`ChunkMesh`](meshing::ChunkMesh) and the
//! interleaved [`Vertex`] array are the whole output.

pub mod meshing;
mod vertex;

// Re-export commonly used types
pub use vertex::Vertex;
