//! # Chunk Iteration Module
//!
//! This module provides an iterator over every cell of a chunk in the fixed
//! x, y, z nested order (x outermost, z innermost). The mesher and the gravity pass
//! both depend on this order being stable between runs.

use cgmath::Point3;

use crate::engine_state::voxels::block::block_type::BlockKind;

use super::{Chunk, CHUNK_DIMENSION};

/// An iterator over all cells in a chunk, air included.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    local_x: i32,
    local_y: i32,
    local_z: i32,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new `ChunkBlockIterator` positioned at local (0, 0, 0).
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }
}

impl Iterator for ChunkBlockIterator<'_> {
    type Item = (Point3<i32>, BlockKind);

    fn next(&mut self) -> Option<Self::Item> {
        if self.local_x == CHUNK_DIMENSION {
            return None;
        }

        let position = Point3::new(self.local_x, self.local_y, self.local_z);
        let block = self
            .chunk_ref
            .get_block(self.local_x, self.local_y, self.local_z);

        // z fastest, then y, then x
        self.local_z += 1;
        if self.local_z == CHUNK_DIMENSION {
            self.local_z = 0;
            self.local_y += 1;
            if self.local_y == CHUNK_DIMENSION {
                self.local_y = 0;
                self.local_x += 1;
            }
        }

        Some((position, block))
    }
}
