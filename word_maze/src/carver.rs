// carver.rs - Randomized depth-first maze carving with forced entry/exit corridors
//
// Carving runs on the lattice of cells two steps apart from the start cell.
// The start cell is the entry itself, so every lattice cell in the entry row
// is reached; the exit corridor below always overlaps one of them.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{Cell, Grid, Position};

/// Lattice steps in the order north, east, south, west (shuffled per cell)
const STEPS: [(i64, i64); 4] = [(0, -2), (2, 0), (0, 2), (-2, 0)];

/// Columns forced open at each end of the entry/exit row
pub const CORRIDOR_LEN: usize = 3;

/// How hard the carver works to guarantee an entry-to-exit route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Open the entry/exit corridors and trust the carve
    Forced,
    /// Same as `Forced`, then flood-fill and open the entry row if the exit is cut off
    #[default]
    Verified,
}

pub fn entry_position(_width: usize, height: usize) -> Position {
    Position::new(0, height / 2)
}

pub fn exit_position(width: usize, height: usize) -> Position {
    Position::new(width.saturating_sub(1), height / 2)
}

/// Build a wall/path grid with a route from entry to exit
pub fn carve<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    connectivity: Connectivity,
    rng: &mut R,
) -> Grid {
    let mut grid = Grid::filled(width, height);
    let entry = entry_position(width, height);
    let exit = exit_position(width, height);

    carve_from(&mut grid, entry, rng);
    open_corridors(&mut grid, entry, exit);

    if connectivity == Connectivity::Verified {
        ensure_connected(&mut grid, entry, exit);
    }

    grid
}

/// One pending cell of the depth-first walk
struct Frame {
    pos: Position,
    steps: [(i64, i64); 4],
    next: usize,
}

impl Frame {
    fn new<R: Rng + ?Sized>(pos: Position, rng: &mut R) -> Self {
        let mut steps = STEPS;
        steps.shuffle(rng);
        Self { pos, steps, next: 0 }
    }
}

fn carve_from<R: Rng + ?Sized>(grid: &mut Grid, start: Position, rng: &mut R) {
    grid.set(start, Cell::Path);
    let mut stack = vec![Frame::new(start, rng)];

    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.steps.len() {
            stack.pop();
            continue;
        }
        let (dx, dy) = frame.steps[frame.next];
        frame.next += 1;

        let (x, y) = (frame.pos.x as i64, frame.pos.y as i64);
        let (nx, ny) = (x + dx, y + dy);
        if !grid.contains(nx, ny) {
            continue;
        }
        let neighbor = Position::new(nx as usize, ny as usize);
        if grid.get(neighbor) != Cell::Wall {
            continue;
        }

        let between = Position::new((x + dx / 2) as usize, (y + dy / 2) as usize);
        grid.set(between, Cell::Path);
        grid.set(neighbor, Cell::Path);
        stack.push(Frame::new(neighbor, rng));
    }
}

fn open_corridors(grid: &mut Grid, entry: Position, exit: Position) {
    let width = grid.width();
    grid.set(entry, Cell::Path);
    grid.set(exit, Cell::Path);

    for x in 0..CORRIDOR_LEN.min(width) {
        grid.set(Position::new(x, entry.y), Cell::Path);
    }
    for x in width.saturating_sub(CORRIDOR_LEN)..width {
        grid.set(Position::new(x, exit.y), Cell::Path);
    }
}

/// Open the entry row when the exit cannot be reached; returns whether it had to
///
/// Entry and exit share a row, so an open row always joins them.
pub fn ensure_connected(grid: &mut Grid, entry: Position, exit: Position) -> bool {
    if is_connected(grid, entry, exit) {
        return false;
    }
    log::warn!(
        "Exit {:?} unreachable from entry {:?} in {}x{} maze; opening entry row",
        exit,
        entry,
        grid.width(),
        grid.height()
    );
    for x in 0..grid.width() {
        grid.set(Position::new(x, entry.y), Cell::Path);
    }
    true
}

/// 4-neighbour flood fill over path cells
pub fn is_connected(grid: &Grid, from: Position, to: Position) -> bool {
    if !grid.is_path(from) || !grid.is_path(to) {
        return false;
    }

    let width = grid.width();
    let mut seen = vec![false; width * grid.height()];
    let mut queue = VecDeque::from([from]);
    seen[from.y * width + from.x] = true;

    while let Some(pos) = queue.pop_front() {
        if pos == to {
            return true;
        }
        for (dx, dy) in [(0i64, -1i64), (1, 0), (0, 1), (-1, 0)] {
            let (nx, ny) = (pos.x as i64 + dx, pos.y as i64 + dy);
            if !grid.contains(nx, ny) {
                continue;
            }
            let next = Position::new(nx as usize, ny as usize);
            let idx = next.y * width + next.x;
            if !seen[idx] && grid.is_path(next) {
                seen[idx] = true;
                queue.push_back(next);
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_entry_and_exit_positions() {
        assert_eq!(entry_position(10, 6), Position::new(0, 3));
        assert_eq!(exit_position(10, 6), Position::new(9, 3));
        assert_eq!(entry_position(7, 5), Position::new(0, 2));
        assert_eq!(exit_position(1, 1), Position::new(0, 0));
    }

    #[test]
    fn test_corridors_are_open() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = carve(12, 9, Connectivity::Forced, &mut rng);
        let row = 9 / 2;
        for x in [0, 1, 2, 9, 10, 11] {
            assert!(grid.is_path(Position::new(x, row)), "column {x} should be open");
        }
    }

    #[test]
    fn test_every_lattice_cell_is_visited() {
        let mut rng = StdRng::seed_from_u64(11);
        let (width, height) = (15, 10);
        let grid = carve(width, height, Connectivity::Forced, &mut rng);
        let start_y = height / 2;
        for pos in grid.positions() {
            if pos.x % 2 == 0 && pos.y % 2 == start_y % 2 {
                assert!(grid.is_path(pos), "lattice cell {pos:?} left as wall");
            }
        }
    }

    #[test]
    fn test_forced_carve_connects_entry_to_exit() {
        for seed in 0..20u64 {
            for (width, height) in [(1, 1), (2, 2), (3, 7), (10, 6), (30, 20), (31, 21), (8, 3)] {
                let mut rng = StdRng::seed_from_u64(seed);
                let grid = carve(width, height, Connectivity::Forced, &mut rng);
                assert!(
                    is_connected(&grid, entry_position(width, height), exit_position(width, height)),
                    "{width}x{height} seed {seed} disconnected"
                );
            }
        }
    }

    #[test]
    fn test_is_connected_detects_split() {
        let mut grid = Grid::filled(5, 1);
        grid.set(Position::new(0, 0), Cell::Path);
        grid.set(Position::new(1, 0), Cell::Path);
        grid.set(Position::new(3, 0), Cell::Path);
        grid.set(Position::new(4, 0), Cell::Path);
        assert!(!is_connected(&grid, Position::new(0, 0), Position::new(4, 0)));

        grid.set(Position::new(2, 0), Cell::Path);
        assert!(is_connected(&grid, Position::new(0, 0), Position::new(4, 0)));
    }

    #[test]
    fn test_disconnected_grid_gets_entry_row_opened() {
        // Two pockets split by a wall column
        let mut grid = Grid::filled(6, 3);
        for (x, y) in [(0, 1), (1, 1), (1, 0), (4, 2), (5, 2), (5, 1)] {
            grid.set(Position::new(x, y), Cell::Path);
        }
        let (entry, exit) = (entry_position(6, 3), exit_position(6, 3));
        assert!(!is_connected(&grid, entry, exit));

        assert!(ensure_connected(&mut grid, entry, exit));
        assert!(is_connected(&grid, entry, exit));
        for x in 0..6 {
            assert!(grid.is_path(Position::new(x, 1)));
        }
        assert!(grid.is_path(Position::new(1, 0)));
        assert!(!grid.is_path(Position::new(3, 0)));

        let before = grid.clone();
        assert!(!ensure_connected(&mut grid, entry, exit));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_same_seed_same_grid() {
        let a = carve(25, 17, Connectivity::Verified, &mut StdRng::seed_from_u64(99));
        let b = carve(25, 17, Connectivity::Verified, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_large_grid_does_not_overflow_stack() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = carve(199, 199, Connectivity::Verified, &mut rng);
        assert!(grid.count(Cell::Path) > 199 * 199 / 4);
    }
}
