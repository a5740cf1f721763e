// words.rs - Spreads vocabulary over wall cells and plants the collection sequence

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{Cell, Grid, Position};

/// How sequence words pick their wall cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencePlacement {
    /// Each sequence word gets its own wall cell, so none is overwritten
    #[default]
    Distinct,
    /// Cells are drawn with replacement; a later word may overwrite an earlier one
    WithReplacement,
}

/// One entry per wall cell: whole copies of `words`, topped up with distinct picks
///
/// Every word appears `ceil(wall_count / words.len())` times or one fewer.
pub fn build_pool<R: Rng + ?Sized>(words: &[String], wall_count: usize, rng: &mut R) -> Vec<String> {
    if words.is_empty() {
        return Vec::new();
    }
    let mut pool = Vec::with_capacity(wall_count);
    for _ in 0..wall_count / words.len() {
        pool.extend(words.iter().cloned());
    }
    pool.extend(words.choose_multiple(rng, wall_count % words.len()).cloned());
    pool
}

/// Assign a word to every wall cell, then force each sequence word onto the walls
pub fn distribute<R: Rng + ?Sized>(
    grid: &Grid,
    words: &[String],
    word_sequence: &[String],
    placement: SequencePlacement,
    rng: &mut R,
) -> Vec<Vec<Option<String>>> {
    let mut pool = build_pool(words, grid.count(Cell::Wall), rng);
    pool.shuffle(rng);
    let mut pool = pool.into_iter();

    let mut cells: Vec<Vec<Option<String>>> = (0..grid.height())
        .map(|y| {
            (0..grid.width())
                .map(|x| match grid.get(Position::new(x, y)) {
                    Cell::Wall => pool.next(),
                    Cell::Path => None,
                })
                .collect()
        })
        .collect();

    let walls: Vec<Position> = grid.positions().filter(|p| !grid.is_path(*p)).collect();
    match placement {
        SequencePlacement::Distinct => place_distinct(&mut cells, walls, word_sequence, rng),
        SequencePlacement::WithReplacement => {
            for word in word_sequence {
                if let Some(pos) = walls.choose(rng) {
                    cells[pos.y][pos.x] = Some(word.clone());
                }
            }
        }
    }
    cells
}

fn place_distinct<R: Rng + ?Sized>(
    cells: &mut [Vec<Option<String>>],
    mut candidates: Vec<Position>,
    word_sequence: &[String],
    rng: &mut R,
) {
    for (placed, word) in word_sequence.iter().enumerate() {
        if candidates.is_empty() {
            log::warn!(
                "Only {} wall cells for a {}-word sequence; skipping the rest",
                placed,
                word_sequence.len()
            );
            return;
        }
        let pos = candidates.swap_remove(rng.gen_range(0..candidates.len()));
        cells[pos.y][pos.x] = Some(word.clone());
    }
}
