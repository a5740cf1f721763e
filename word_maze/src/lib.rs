// lib.rs - Word maze generation: grid carving, word distribution and monster placement
//
// `generate_maze` is the single entry point. Each call owns its grid and
// borrows its random source, so concurrent callers share nothing.

pub mod carver;
pub mod error_handling;
pub mod monsters;
pub mod types;
pub mod words;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Deserializer, Serialize};

pub use carver::Connectivity;
pub use error_handling::{MazeError, Result};
pub use types::{Cell, Direction, Grid, MazeResult, Monster, Position};
pub use words::SequencePlacement;

pub const DEFAULT_WIDTH: i64 = 30;
pub const DEFAULT_HEIGHT: i64 = 20;
pub const MAX_DIMENSION: usize = 200;

/// Vocabulary used when a request brings none
pub const FALLBACK_WORDS: [&str; 5] = ["WORD", "MAZE", "GAME", "PLAY", "FUN"];

/// Length of the collection sequence derived from `words` when none is given
pub const DEFAULT_SEQUENCE_LEN: usize = 5;

/// Raw generation input as clients send it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeRequest {
    #[serde(default = "default_width")]
    pub width: i64,
    #[serde(default = "default_height")]
    pub height: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub words: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub word_sequence: Vec<String>,
}

/// An explicit `null` list means the same as an absent one
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_width() -> i64 {
    DEFAULT_WIDTH
}

fn default_height() -> i64 {
    DEFAULT_HEIGHT
}

impl Default for MazeRequest {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            words: Vec::new(),
            word_sequence: Vec::new(),
        }
    }
}

impl MazeRequest {
    pub fn new(width: i64, height: i64, words: &[&str], word_sequence: &[&str]) -> Self {
        Self {
            width,
            height,
            words: words.iter().map(|w| w.to_string()).collect(),
            word_sequence: word_sequence.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Validate dimensions and apply the word defaults
    pub fn resolve(&self) -> Result<ResolvedRequest> {
        let width = dimension("width", self.width)?;
        let height = dimension("height", self.height)?;

        let words: Vec<String> = if self.words.is_empty() {
            FALLBACK_WORDS.iter().map(|w| w.to_string()).collect()
        } else {
            self.words
                .iter()
                .filter(|w| !w.trim().is_empty())
                .cloned()
                .collect()
        };
        if words.is_empty() {
            return Err(MazeError::invalid("word list contains only blank entries"));
        }

        let word_sequence = if self.word_sequence.is_empty() {
            words.iter().take(DEFAULT_SEQUENCE_LEN).cloned().collect()
        } else {
            self.word_sequence.clone()
        };

        Ok(ResolvedRequest {
            width,
            height,
            words,
            word_sequence,
        })
    }
}

fn dimension(name: &str, value: i64) -> Result<usize> {
    if value <= 0 {
        return Err(MazeError::invalid(format!("{name} must be positive, got {value}")));
    }
    let value = value as usize;
    if value > MAX_DIMENSION {
        return Err(MazeError::invalid(format!(
            "{name} {value} exceeds maximum of {MAX_DIMENSION}"
        )));
    }
    Ok(value)
}

/// A request with defaults applied and bounds checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    pub width: usize,
    pub height: usize,
    pub words: Vec<String>,
    pub word_sequence: Vec<String>,
}

/// Behavior switches for the two places where the classic algorithm is lossy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default)]
    pub connectivity: Connectivity,
    #[serde(default)]
    pub sequence_placement: SequencePlacement,
}

pub fn generate_maze<R: Rng + ?Sized>(
    request: &MazeRequest,
    options: &GenerationOptions,
    rng: &mut R,
) -> Result<MazeResult> {
    let resolved = request.resolve()?;
    let (width, height) = (resolved.width, resolved.height);

    let grid = carver::carve(width, height, options.connectivity, rng);
    let start = carver::entry_position(width, height);
    let end = carver::exit_position(width, height);

    let cells = words::distribute(
        &grid,
        &resolved.words,
        &resolved.word_sequence,
        options.sequence_placement,
        rng,
    );
    let monsters = monsters::place_monsters(&grid, start, rng);

    log::debug!(
        "Generated {}x{} maze: {} walls, {} monsters, {}-word sequence",
        width,
        height,
        grid.count(Cell::Wall),
        monsters.len(),
        resolved.word_sequence.len()
    );

    Ok(MazeResult {
        grid: cells,
        start,
        end,
        monsters,
        width,
        height,
        word_sequence: resolved.word_sequence,
    })
}

/// Deterministic generation from a fixed seed
pub fn generate_seeded(request: &MazeRequest, options: &GenerationOptions, seed: u64) -> Result<MazeResult> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_maze(request, options, &mut rng)
}
