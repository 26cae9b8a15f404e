//! # Gravity Simulation Module
//!
//! Moves loose material towards the planet center one discrete tick at a time.
//!
//! ## Tick
//!
//! 1. Chunks are visited outermost first, by distance of their centers from the world
//!    center, so material far from the gravity target settles before material closer in.
//! 2. Each chunk is scanned in x, y, z nested order. Air, Stone and Bedrock never
//!    move. A block moved into a cell this tick is settled and is not processed again.
//! 3. A loose solid falls into Air below it, sinks through Water below it by swapping, or
//!    else slides diagonally into a random open cell among the four down-and-sideways
//!    neighbours.
//! 4. Water falls into Air below it. Resting on a solid, it spreads into a random Air cell
//!    beside it. Water never trades places with water.
//! 5. Every move dirties the source and destination chunks and their face neighbours.
//!    Those chunks are remeshed once, after the scan.
//!
//! "Below" is the radial-down direction: the axis direction best aligned with the vector
//! to the world center. No move ever leaves the world.
//!
//! The simulator owns its own random stream, so running ticks never changes what a later
//! world generation produces.

use std::collections::HashSet;

use bitvec::vec::BitVec;
use cgmath::{InnerSpace, MetricSpace, Point3, Vector3};
use log::debug;
use web_time::Instant;

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, block_type::BlockKind},
    chunk::CHUNK_DIMENSION,
    world::World,
};

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Moves into Air, including solid slides and water falls
    pub moved: usize,
    /// Solids that traded places with Water
    pub swapped: usize,
    /// Sideways water moves
    pub spread: usize,
    /// Chunks remeshed at the end of the tick, sorted
    pub rebuilt: Vec<Point3<i32>>,
}

impl TickReport {
    pub fn total_moves(&self) -> usize {
        self.moved + self.swapped + self.spread
    }
}

/// Returns the axis direction from `pos` that points most directly at `center`.
///
/// Ties go to the direction listed first by [`BlockSide::all`].
pub fn radial_down(pos: Point3<i32>, center: Point3<f32>) -> BlockSide {
    let to_center: Vector3<f32> = center - Point3::new(pos.x as f32, pos.y as f32, pos.z as f32);
    let mut best = BlockSide::BACK;
    let mut best_dot = f32::NEG_INFINITY;
    for side in BlockSide::all() {
        let n = side.normal();
        let dot = Vector3::new(n.x as f32, n.y as f32, n.z as f32).dot(to_center);
        if dot > best_dot {
            best = side;
            best_dot = dot;
        }
    }
    best
}

/// One bit per cell of the world lattice.
struct SettledCells {
    bits: BitVec,
    extent: i32,
}

impl SettledCells {
    fn new(extent: i32) -> Self {
        let len = (extent.max(0) as usize).pow(3);
        SettledCells {
            bits: BitVec::repeat(false, len),
            extent,
        }
    }

    fn index(&self, pos: Point3<i32>) -> Option<usize> {
        let range = 0..self.extent;
        if range.contains(&pos.x) && range.contains(&pos.y) && range.contains(&pos.z) {
            Some((pos.x + pos.y * self.extent + pos.z * self.extent * self.extent) as usize)
        } else {
            None
        }
    }

    fn contains(&self, pos: Point3<i32>) -> bool {
        self.index(pos).is_some_and(|i| self.bits[i])
    }

    fn insert(&mut self, pos: Point3<i32>) {
        if let Some(i) = self.index(pos) {
            self.bits.set(i, true);
        }
    }
}

/// State carried through a single tick.
struct TickState {
    center: Point3<f32>,
    settled: SettledCells,
    dirty: HashSet<Point3<i32>>,
    report: TickReport,
}

/// Runs gravity ticks over a [`World`].
#[derive(Debug, Clone)]
pub struct GravitySimulator {
    rng: fastrand::Rng,
    ticks: u64,
}

impl GravitySimulator {
    /// Creates a simulator whose random choices are driven by `seed`.
    pub fn new(seed: u64) -> Self {
        GravitySimulator {
            rng: fastrand::Rng::with_seed(seed),
            ticks: 0,
        }
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Runs one tick over the whole world and remeshes the chunks it touched.
    pub fn tick(&mut self, world: &mut World) -> TickReport {
        let start = Instant::now();
        let center = world.world_center();
        let mut state = TickState {
            center,
            settled: SettledCells::new(world.extent()),
            dirty: HashSet::new(),
            report: TickReport::default(),
        };

        let half = CHUNK_DIMENSION as f32 / 2.0;
        let chunk_distance = |origin: &Point3<i32>| {
            Point3::new(origin.x as f32 + half, origin.y as f32 + half, origin.z as f32 + half)
                .distance(center)
        };
        let mut origins = world.chunk_origins();
        origins.sort_by(|a, b| chunk_distance(b).total_cmp(&chunk_distance(a)));

        for origin in origins {
            for x in 0..CHUNK_DIMENSION {
                for y in 0..CHUNK_DIMENSION {
                    for z in 0..CHUNK_DIMENSION {
                        let pos = origin + Vector3::new(x, y, z);
                        if state.settled.contains(pos) {
                            continue;
                        }
                        let kind = world.get_block(pos);
                        if kind.is_movable_solid() {
                            self.step_solid(world, &mut state, pos, kind);
                        } else if kind.is_fluid() {
                            self.step_water(world, &mut state, pos);
                        }
                    }
                }
            }
        }

        let mut report = state.report;
        report.rebuilt = world.rebuild_chunks(state.dirty);
        self.ticks += 1;

        debug!(
            "Tick {}: {} moved, {} swapped, {} spread, {} chunks remeshed in {:?}",
            self.ticks,
            report.moved,
            report.swapped,
            report.spread,
            report.rebuilt.len(),
            start.elapsed()
        );
        report
    }

    fn step_solid(&mut self, world: &mut World, state: &mut TickState, pos: Point3<i32>, kind: BlockKind) {
        let down = radial_down(pos, state.center);
        let below = pos + down.normal();

        if world.is_inside(below) {
            match world.get_block(below) {
                BlockKind::Air => {
                    if relocate(world, state, pos, below, kind, BlockKind::Air) {
                        state.report.moved += 1;
                    }
                    return;
                }
                BlockKind::Water => {
                    if relocate(world, state, pos, below, kind, BlockKind::Water) {
                        state.report.swapped += 1;
                    }
                    return;
                }
                _ => {}
            }
        }

        let candidates: Vec<_> = down
            .perpendicular()
            .into_iter()
            .map(|side| below + side.normal())
            .filter(|c| world.is_inside(*c) && world.get_block(*c).is_transparent())
            .collect();
        if candidates.is_empty() {
            return;
        }

        let target = candidates[self.rng.usize(..candidates.len())];
        let displaced = world.get_block(target);
        if relocate(world, state, pos, target, kind, displaced) {
            if displaced == BlockKind::Water {
                state.report.swapped += 1;
            } else {
                state.report.moved += 1;
            }
        }
    }

    fn step_water(&mut self, world: &mut World, state: &mut TickState, pos: Point3<i32>) {
        let down = radial_down(pos, state.center);
        let below = pos + down.normal();
        if !world.is_inside(below) {
            return;
        }

        let under = world.get_block(below);
        if under == BlockKind::Air {
            if relocate(world, state, pos, below, BlockKind::Water, BlockKind::Air) {
                state.report.moved += 1;
            }
            return;
        }
        if !under.is_solid() {
            return;
        }

        let candidates: Vec<_> = down
            .perpendicular()
            .into_iter()
            .map(|side| pos + side.normal())
            .filter(|c| world.is_inside(*c) && world.get_block(*c) == BlockKind::Air)
            .collect();
        if candidates.is_empty() {
            return;
        }

        let target = candidates[self.rng.usize(..candidates.len())];
        if relocate(world, state, pos, target, BlockKind::Water, BlockKind::Air) {
            state.report.spread += 1;
        }
    }
}

/// Puts `kind` at `to` and `displaced` at `from`, settling both cells and recording the
/// touched chunks and their neighbours for remeshing.
fn relocate(
    world: &mut World,
    state: &mut TickState,
    from: Point3<i32>,
    to: Point3<i32>,
    kind: BlockKind,
    displaced: BlockKind,
) -> bool {
    if !world.is_inside(to) || world.set_block(to, kind, false).is_err() {
        return false;
    }
    if world.set_block(from, displaced, false).is_err() {
        // Undo so a block is never duplicated.
        let _ = world.set_block(to, displaced, false);
        return false;
    }

    state.settled.insert(to);
    if displaced != BlockKind::Air {
        state.settled.insert(from);
    }
    for origin in [World::chunk_origin_of(from), World::chunk_origin_of(to)] {
        state.dirty.insert(origin);
        for side in BlockSide::all() {
            state.dirty.insert(World::neighbour_origin(origin, side));
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::config::WorldConfig;

    fn one_chunk_world() -> World {
        World::blank(WorldConfig {
            world_size: 1,
            ..WorldConfig::default()
        })
    }

    #[test]
    fn radial_down_points_at_the_center() {
        let center = Point3::new(8.0, 8.0, 8.0);
        assert_eq!(radial_down(Point3::new(8, 12, 8), center), BlockSide::BOTTOM);
        assert_eq!(radial_down(Point3::new(8, 2, 8), center), BlockSide::TOP);
        assert_eq!(radial_down(Point3::new(1, 7, 8), center), BlockSide::RIGHT);
        assert_eq!(radial_down(Point3::new(8, 8, 15), center), BlockSide::BACK);
        // Equal pull along y and z: Back comes before Bottom.
        assert_eq!(radial_down(Point3::new(8, 12, 12), center), BlockSide::BACK);
    }

    #[test]
    fn sand_falls_one_cell_towards_the_center() {
        let mut world = one_chunk_world();
        world.set_block(Point3::new(8, 10, 8), BlockKind::Stone, false).unwrap();
        world.set_block(Point3::new(8, 12, 8), BlockKind::Sand, false).unwrap();
        world.rebuild_dirty();

        let report = GravitySimulator::new(1).tick(&mut world);
        assert_eq!(report.moved, 1);
        assert_eq!(world.get_block(Point3::new(8, 12, 8)), BlockKind::Air);
        assert_eq!(world.get_block(Point3::new(8, 11, 8)), BlockKind::Sand);
        assert_eq!(report.rebuilt, vec![Point3::new(0, 0, 0)]);
        assert!(world.dirty_chunks().is_empty());
    }

    #[test]
    fn sand_sinks_through_water() {
        let mut world = one_chunk_world();
        // A one-cell pool, so the water itself has nowhere to go.
        for (x, y, z) in [(8, 10, 8), (7, 11, 8), (9, 11, 8), (8, 11, 7), (8, 11, 9)] {
            world.set_block(Point3::new(x, y, z), BlockKind::Stone, false).unwrap();
        }
        world.set_block(Point3::new(8, 11, 8), BlockKind::Water, false).unwrap();
        world.set_block(Point3::new(8, 12, 8), BlockKind::Sand, false).unwrap();

        let report = GravitySimulator::new(1).tick(&mut world);
        assert_eq!(report.swapped, 1);
        assert_eq!(report.total_moves(), 1);
        assert_eq!(world.get_block(Point3::new(8, 11, 8)), BlockKind::Sand);
        assert_eq!(world.get_block(Point3::new(8, 12, 8)), BlockKind::Water);
    }

    #[test]
    fn blocked_sand_slides_diagonally() {
        let mut world = one_chunk_world();
        world.set_block(Point3::new(8, 11, 8), BlockKind::Stone, false).unwrap();
        world.set_block(Point3::new(8, 12, 8), BlockKind::Sand, false).unwrap();

        let report = GravitySimulator::new(3).tick(&mut world);
        assert_eq!(report.moved, 1);
        assert_eq!(world.get_block(Point3::new(8, 12, 8)), BlockKind::Air);
        let landed: Vec<_> = [(7, 8), (9, 8), (8, 7), (8, 9)]
            .into_iter()
            .filter(|(x, z)| world.get_block(Point3::new(*x, 11, *z)) == BlockKind::Sand)
            .collect();
        assert_eq!(landed.len(), 1);
    }

    #[test]
    fn water_spreads_into_exactly_one_open_side() {
        for seed in 0..16 {
            let mut world = one_chunk_world();
            world.set_block(Point3::new(8, 11, 8), BlockKind::Stone, false).unwrap();
            world.set_block(Point3::new(8, 12, 7), BlockKind::Stone, false).unwrap();
            world.set_block(Point3::new(8, 12, 9), BlockKind::Stone, false).unwrap();
            world.set_block(Point3::new(8, 12, 8), BlockKind::Water, false).unwrap();

            let report = GravitySimulator::new(seed).tick(&mut world);
            assert_eq!(report.spread, 1);
            assert_eq!(world.get_block(Point3::new(8, 12, 8)), BlockKind::Air);
            let left = world.get_block(Point3::new(7, 12, 8)) == BlockKind::Water;
            let right = world.get_block(Point3::new(9, 12, 8)) == BlockKind::Water;
            assert!(left ^ right, "seed {}", seed);
        }
    }

    #[test]
    fn water_does_not_stack_through_water() {
        let mut world = one_chunk_world();
        for (x, y, z) in [(8, 10, 8), (7, 11, 8), (9, 11, 8), (8, 11, 7), (8, 11, 9)] {
            world.set_block(Point3::new(x, y, z), BlockKind::Stone, false).unwrap();
        }
        world.set_block(Point3::new(8, 11, 8), BlockKind::Water, false).unwrap();
        world.set_block(Point3::new(8, 12, 8), BlockKind::Water, false).unwrap();

        let report = GravitySimulator::new(5).tick(&mut world);
        // Resting on water is not resting on a solid, so the top cell stays put.
        assert_eq!(report.total_moves(), 0);
        assert_eq!(world.get_block(Point3::new(8, 11, 8)), BlockKind::Water);
        assert_eq!(world.get_block(Point3::new(8, 12, 8)), BlockKind::Water);
    }

    #[test]
    fn immovable_blocks_stay() {
        let mut world = one_chunk_world();
        for kind in [BlockKind::Stone, BlockKind::Bedrock] {
            world.set_block(Point3::new(8, 14, 8), kind, false).unwrap();
            let report = GravitySimulator::new(0).tick(&mut world);
            assert_eq!(report.total_moves(), 0);
            assert_eq!(world.get_block(Point3::new(8, 14, 8)), kind);
        }
    }

    #[test]
    fn magma_falls_like_loose_material() {
        let mut world = one_chunk_world();
        world.set_block(Point3::new(8, 13, 8), BlockKind::Magma, false).unwrap();

        let report = GravitySimulator::new(0).tick(&mut world);
        assert_eq!(report.moved, 1);
        assert_eq!(world.get_block(Point3::new(8, 13, 8)), BlockKind::Air);
        assert_eq!(world.get_block(Point3::new(8, 12, 8)), BlockKind::Magma);
    }

    #[test]
    fn blocks_never_leave_the_world() {
        let mut world = one_chunk_world();
        // Radial-down from this corner points inwards, so fill the inward cells to force
        // the diagonal checks against the boundary.
        world.set_block(Point3::new(0, 0, 1), BlockKind::Stone, false).unwrap();
        world.set_block(Point3::new(0, 0, 0), BlockKind::Sand, false).unwrap();
        let before = world.stats().non_air_blocks;
        let mut sim = GravitySimulator::new(9);
        for _ in 0..5 {
            sim.tick(&mut world);
        }
        assert_eq!(world.stats().non_air_blocks, before);
    }
}
