//! # Block Type Module
//!
//! This module defines the closed set of block kinds that make up the planet and the
//! catalog of physical and visual properties attached to each of them.
//!
//! The catalog is process-wide immutable data: every property is a `const fn` match on
//! the variant, so lookups cost nothing and can never drift at runtime.

use std::fmt;

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all block kinds in the voxel world.
///
/// The discriminants are stable and fit in a [`BlockTypeSize`], which lets chunk grids be
/// compared byte-for-byte. `FromPrimitive` allows the reverse conversion.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive)]
pub enum BlockKind {
    /// Empty space. Transparent, never drawn.
    #[default]
    Air = 0,

    /// Indestructible mantle rock.
    Bedrock = 1,

    /// Deep crust rock. Does not fall.
    Stone = 2,

    /// Loose soil found below the surface crust and in surface patches.
    Dirt = 3,

    /// Loose beach and desert material.
    Sand = 4,

    /// Loose rock fragments found in surface patches.
    Gravel = 5,

    /// Loose sediment found in surface patches.
    Clay = 6,

    /// Temperate surface cover.
    Grass = 7,

    /// Cold and high-altitude surface cover.
    Snow = 8,

    /// Molten core material.
    Magma = 9,

    /// The only fluid. Drawn translucent.
    Water = 10,
}

impl BlockKind {
    /// Every block kind, in discriminant order.
    pub const ALL: [BlockKind; 11] = [
        BlockKind::Air,
        BlockKind::Bedrock,
        BlockKind::Stone,
        BlockKind::Dirt,
        BlockKind::Sand,
        BlockKind::Gravel,
        BlockKind::Clay,
        BlockKind::Grass,
        BlockKind::Snow,
        BlockKind::Magma,
        BlockKind::Water,
    ];

    /// Converts a stored [`BlockTypeSize`] back into a `BlockKind`.
    ///
    /// Unknown values decode as [`BlockKind::Air`] so a corrupted byte reads as empty space
    /// instead of aborting.
    pub fn from_int(btype: BlockTypeSize) -> Self {
        num::FromPrimitive::from_u8(btype).unwrap_or(BlockKind::Air)
    }

    /// The compact storage value of this kind.
    pub const fn to_int(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Whether faces of neighbouring blocks are visible through this block.
    pub const fn is_transparent(self) -> bool {
        matches!(self, BlockKind::Air | BlockKind::Water)
    }

    /// Whether this block occupies its cell as a solid (anything but Air and Water).
    pub const fn is_solid(self) -> bool {
        !self.is_transparent()
    }

    /// Whether this block falls under gravity. Only Bedrock and Stone hold their cell.
    pub const fn is_movable_solid(self) -> bool {
        matches!(
            self,
            BlockKind::Magma
                | BlockKind::Dirt
                | BlockKind::Sand
                | BlockKind::Gravel
                | BlockKind::Clay
                | BlockKind::Grass
                | BlockKind::Snow
        )
    }

    /// Whether this block flows. Water is the only fluid.
    pub const fn is_fluid(self) -> bool {
        matches!(self, BlockKind::Water)
    }

    /// Whether player edits are allowed to remove this block.
    pub const fn is_indestructible(self) -> bool {
        matches!(self, BlockKind::Bedrock)
    }

    /// Flat RGBA color used for every vertex of this block's faces.
    pub const fn color(self) -> [f32; 4] {
        match self {
            BlockKind::Air => [0.0, 0.0, 0.0, 0.0],
            BlockKind::Bedrock => [0.08, 0.08, 0.1, 1.0],
            BlockKind::Stone => [0.5, 0.5, 0.5, 1.0],
            BlockKind::Dirt => [0.6, 0.4, 0.2, 1.0],
            BlockKind::Sand => [0.93, 0.85, 0.55, 1.0],
            BlockKind::Gravel => [0.55, 0.52, 0.5, 1.0],
            BlockKind::Clay => [0.62, 0.64, 0.72, 1.0],
            BlockKind::Grass => [0.3, 0.65, 0.2, 1.0],
            BlockKind::Snow => [0.95, 0.97, 1.0, 1.0],
            BlockKind::Magma => [0.9, 0.3, 0.05, 1.0],
            BlockKind::Water => [0.15, 0.35, 0.85, 0.6],
        }
    }

    /// Human readable name.
    pub const fn name(self) -> &'static str {
        match self {
            BlockKind::Air => "Air",
            BlockKind::Bedrock => "Bedrock",
            BlockKind::Stone => "Stone",
            BlockKind::Dirt => "Dirt",
            BlockKind::Sand => "Sand",
            BlockKind::Gravel => "Gravel",
            BlockKind::Clay => "Clay",
            BlockKind::Grass => "Grass",
            BlockKind::Snow => "Snow",
            BlockKind::Magma => "Magma",
            BlockKind::Water => "Water",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_conversion_covers_every_kind() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::from_int(kind.to_int()), kind);
        }
        assert_eq!(BlockKind::from_int(200), BlockKind::Air);
    }

    #[test]
    fn only_air_and_water_are_transparent() {
        let transparent: Vec<_> = BlockKind::ALL
            .into_iter()
            .filter(|k| k.is_transparent())
            .collect();
        assert_eq!(transparent, vec![BlockKind::Air, BlockKind::Water]);
    }

    #[test]
    fn only_stone_and_bedrock_hold_their_cell() {
        assert!(!BlockKind::Stone.is_movable_solid());
        assert!(!BlockKind::Bedrock.is_movable_solid());
        assert!(BlockKind::Magma.is_movable_solid());
        assert!(!BlockKind::Water.is_movable_solid());
        assert!(BlockKind::Sand.is_movable_solid());
        assert!(BlockKind::Dirt.is_movable_solid());
    }

    #[test]
    fn water_is_the_only_fluid() {
        for kind in BlockKind::ALL {
            assert_eq!(kind.is_fluid(), kind == BlockKind::Water);
        }
        assert!(BlockKind::Bedrock.is_indestructible());
    }
}
