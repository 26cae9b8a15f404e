//! # Block Module
//!
//! This module provides the block catalog for the voxel engine: the closed set of block
//! kinds, their constant properties, and the six face directions used for culling and
//! gravity.

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block kinds in memory.
pub type BlockTypeSize = u8;
