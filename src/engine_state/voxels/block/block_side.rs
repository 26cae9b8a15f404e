//! # Block Side Module
//!
//! This module defines the six axis-aligned faces of a voxel block. The same six
//! directions drive face culling in the mesher and the snapped gravity direction in the
//! simulation, so their order is part of the contract.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The iteration order returned by [`BlockSide::all`] is Back, Front, Top, Bottom, Left,
/// Right. Whenever two directions score equally (for example when picking the radial-down
/// direction) the one that comes first in this order wins.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The back face (facing negative Z)
    BACK = 0,

    /// The front face (facing positive Z)
    FRONT = 1,

    /// The top face (facing positive Y)
    TOP = 2,

    /// The bottom face (facing negative Y)
    BOTTOM = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::BACK,
            BlockSide::FRONT,
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// The unit offset from a block to its neighbour across this face.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
        }
    }

    /// The face pointing the other way along the same axis.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::BACK => BlockSide::FRONT,
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::BOTTOM => BlockSide::TOP,
            BlockSide::LEFT => BlockSide::RIGHT,
            BlockSide::RIGHT => BlockSide::LEFT,
        }
    }

    /// The four faces perpendicular to this one, in [`BlockSide::all`] order.
    pub fn perpendicular(self) -> [BlockSide; 4] {
        let mut sides = [self; 4];
        let mut n = 0;
        for side in BlockSide::all() {
            if side != self && side != self.opposite() {
                sides[n] = side;
                n += 1;
            }
        }
        sides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_normals_cancel() {
        for side in BlockSide::all() {
            assert_eq!(side.normal() + side.opposite().normal(), Vector3::new(0, 0, 0));
        }
    }

    #[test]
    fn perpendicular_excludes_own_axis() {
        let perp = BlockSide::BOTTOM.perpendicular();
        assert_eq!(
            perp,
            [BlockSide::BACK, BlockSide::FRONT, BlockSide::LEFT, BlockSide::RIGHT]
        );
        for side in BlockSide::all() {
            for p in side.perpendicular() {
                let (a, b) = (side.normal(), p.normal());
                assert_eq!(a.x * b.x + a.y * b.y + a.z * b.z, 0);
            }
        }
    }
}
