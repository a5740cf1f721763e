// lib.rs - Library exports for the word maze game server
// The maze core lives in the `word_maze` crate; this crate wires it to HTTP
// alongside the level, sprite and leaderboard collaborators.

pub mod config;
pub mod error_handling;
pub mod http_server;
pub mod leaderboard;
pub mod levels;
pub mod sprites;

// Re-export commonly used types
pub use config::{Args, ServerConfig};
pub use error_handling::{Result, ServerError};
pub use leaderboard::{Leaderboard, LeaderboardData, LeaderboardEntry, ScoreSubmission, Standings, Storage};
