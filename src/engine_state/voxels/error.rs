//! # Voxel Errors
//!
//! Error types for the voxel world. None of them is fatal: an out-of-bounds edit is a
//! no-op, a failed chunk is skipped and can be regenerated on its own, and a bad config
//! file falls back to defaults in the caller.

use cgmath::Point3;

/// Errors reported by world edits and chunk (re)generation.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The position lies outside `[0, world_size * CHUNK_DIMENSION)` on some axis.
    #[error("position {position:?} is outside the world")]
    OutOfBounds { position: Point3<i32> },

    /// The position is inside the world bounds but no chunk is registered for it.
    #[error("no chunk loaded at origin {origin:?}")]
    ChunkNotLoaded { origin: Point3<i32> },

    /// Populating a chunk failed; the chunk was discarded.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Errors raised while populating a single chunk.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// A noise layer produced NaN or infinity, usually from a non-finite config value.
    #[error("noise layer `{layer}` produced a non-finite sample at {position:?}")]
    NonFiniteSample {
        position: Point3<i32>,
        layer: &'static str,
    },
}

/// Errors raised while loading a [`WorldConfig`](super::config::WorldConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
