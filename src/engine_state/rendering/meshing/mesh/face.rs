use cgmath::Point3;

use crate::engine_state::voxels::block::{block_side::BlockSide, block_type::BlockKind};

/// Represents a single quad face of a voxel in the mesh.
///
/// A face is defined by four corner points (lower-left, lower-right, upper-left, upper-right)
/// in chunk-local block units. Seen from outside the block, `ll -> lr -> ur` runs
/// counter-clockwise, so the index pattern from [`Face::indices`] gives a consistent
/// winding for every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-left corner of the face in chunk coordinates
    pub ll: Point3<i32>,
    /// Lower-right corner of the face in chunk coordinates
    pub lr: Point3<i32>,
    /// Upper-left corner of the face in chunk coordinates
    pub ul: Point3<i32>,
    /// Upper-right corner of the face in chunk coordinates
    pub ur: Point3<i32>,
    /// The block this face belongs to
    pub kind: BlockKind,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates a new face for a voxel at the given coordinates.
    ///
    /// # Arguments
    /// * `i`, `j`, `k` - The coordinates of the voxel in chunk space
    /// * `kind` - The kind of the block, used for coloring and grouping
    /// * `block_side` - Which side of the block this face represents
    ///
    /// # Returns
    /// A new `Face` with its corners placed on the matching side of the unit cube.
    pub fn new(i: i32, j: i32, k: i32, kind: BlockKind, block_side: BlockSide) -> Self {
        let p = Point3::new;
        let (ll, lr, ul, ur) = match block_side {
            BlockSide::RIGHT => (
                p(i + 1, j, k + 1),
                p(i + 1, j, k),
                p(i + 1, j + 1, k + 1),
                p(i + 1, j + 1, k),
            ),
            BlockSide::LEFT => (
                p(i, j, k),
                p(i, j, k + 1),
                p(i, j + 1, k),
                p(i, j + 1, k + 1),
            ),
            BlockSide::FRONT => (
                p(i, j, k + 1),
                p(i + 1, j, k + 1),
                p(i, j + 1, k + 1),
                p(i + 1, j + 1, k + 1),
            ),
            BlockSide::BACK => (
                p(i + 1, j, k),
                p(i, j, k),
                p(i + 1, j + 1, k),
                p(i, j + 1, k),
            ),
            BlockSide::TOP => (
                p(i, j + 1, k + 1),
                p(i + 1, j + 1, k + 1),
                p(i, j + 1, k),
                p(i + 1, j + 1, k),
            ),
            BlockSide::BOTTOM => (
                p(i, j, k),
                p(i + 1, j, k),
                p(i, j, k + 1),
                p(i + 1, j, k + 1),
            ),
        };

        Face {
            ll,
            lr,
            ul,
            ur,
            kind,
            block_side,
        }
    }

    /// The four corners in vertex-buffer order.
    pub fn corners(&self) -> [Point3<i32>; 4] {
        [self.ll, self.lr, self.ul, self.ur]
    }

    /// Index data for this face, given the index of its first vertex.
    ///
    /// # Returns
    /// Two triangles (6 indices): `ll, lr, ur` and `ll, ur, ul`.
    pub fn indices(base: u32) -> [u32; 6] {
        [base, base + 1, base + 3, base, base + 3, base + 2]
    }
}
