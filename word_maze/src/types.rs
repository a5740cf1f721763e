// types.rs - Shared type definitions for generated word mazes
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// A single grid square. Walls carry words once the grid is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Path,
}

/// Row-major wall/path grid owned by one generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// A grid where every cell starts out as wall
    pub fn filled(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Wall; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Signed bounds check, used when stepping off the edge is possible
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn get(&self, pos: Position) -> Cell {
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }

    pub fn is_path(&self, pos: Position) -> bool {
        self.get(pos) == Cell::Path
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    fn index(&self, pos: Position) -> usize {
        debug_assert!(pos.x < self.width && pos.y < self.height, "position {pos:?} out of bounds");
        pos.y * self.width + pos.x
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Patrol actor placed on a path cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    #[serde(flatten)]
    pub position: Position,
    pub direction: Direction,
    pub steps: u32,
}

/// Complete output of one generation call, serialized as-is to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeResult {
    /// `height` rows of `width` cells; `None` marks a path cell
    pub grid: Vec<Vec<Option<String>>>,
    pub start: Position,
    pub end: Position,
    pub monsters: Vec<Monster>,
    pub width: usize,
    pub height: usize,
    pub word_sequence: Vec<String>,
}

impl MazeResult {
    pub fn cell(&self, pos: Position) -> Option<&str> {
        self.grid
            .get(pos.y)
            .and_then(|row| row.get(pos.x))
            .and_then(|c| c.as_deref())
    }

    /// Number of cells holding exactly `word`
    pub fn occurrences(&self, word: &str) -> usize {
        self.grid
            .iter()
            .flatten()
            .filter(|c| c.as_deref() == Some(word))
            .count()
    }
}
