//! # Voxel Engine Core
//!
//! This module contains the storage and generation side of the planet.
//!
//! ## Architecture
//!
//! * **Block**: The closed set of block kinds and their constant properties
//! * **Chunk**: Fixed-size 3D arrays of blocks with a dirty flag and their last mesh
//! * **World**: The chunk lattice, coordinate translation and the block-write gateway
//! * **Terrain**: Seeded noise that fills chunks to look like a planet
//! * **Config**: Generation parameters and their valid ranges
//! * **Error**: Error types for edits, generation and config loading
//!
//! ## Data Flow
//!
//! 1. The world snapshots its config and asks the terrain generator for each chunk
//! 2. Block edits go through the world, which marks the affected chunks dirty
//! 3. Dirty chunks are remeshed by the rendering side when the caller asks

pub mod block;
pub mod chunk;
pub mod config;
pub mod error;
pub mod terrain;
pub mod world;
