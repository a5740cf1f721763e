// monsters.rs - Patrol monster placement on path cells

use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{Direction, Grid, Monster, Position};

pub const MONSTER_COUNT: RangeInclusive<usize> = 2..=3;
pub const PATROL_STEPS: RangeInclusive<u32> = 3..=7;

/// Half-extent of the safe box around the entry (exclusive)
pub const SAFE_ZONE_X: usize = 5;
pub const SAFE_ZONE_Y: usize = 3;

pub fn in_safe_zone(pos: Position, entry: Position) -> bool {
    pos.x.abs_diff(entry.x) < SAFE_ZONE_X && pos.y.abs_diff(entry.y) < SAFE_ZONE_Y
}

/// Sample path cells first, then drop those inside the safe zone.
///
/// The filter runs after sampling, so fewer monsters than drawn (possibly
/// none) come back on small or crowded mazes.
pub fn place_monsters<R: Rng + ?Sized>(grid: &Grid, entry: Position, rng: &mut R) -> Vec<Monster> {
    let path_cells: Vec<Position> = grid.positions().filter(|p| grid.is_path(*p)).collect();
    let wanted = rng.gen_range(MONSTER_COUNT).min(path_cells.len());

    let sampled: Vec<Position> = path_cells.choose_multiple(rng, wanted).copied().collect();

    sampled
        .into_iter()
        .filter(|pos| !in_safe_zone(*pos, entry))
        .map(|position| Monster {
            position,
            direction: Direction::random(rng),
            steps: rng.gen_range(PATROL_STEPS),
        })
        .collect()
}
