// config.rs - Command line arguments and the resolved server configuration

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use word_maze::{Connectivity, GenerationOptions, SequencePlacement};

use crate::error_handling::{Result, ServerError};
use crate::leaderboard::Storage;

/// CLI
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// HTTP port (the PORT environment variable takes precedence)
    #[arg(short, long, default_value = "5000")]
    pub port: u16,

    /// Directory served under /static
    #[arg(long, default_value = "static")]
    pub static_dir: PathBuf,

    /// Page served at /
    #[arg(long, default_value = "templates/index.html")]
    pub index: PathBuf,

    /// Level text JSON file
    #[arg(long, default_value = "texts.json")]
    pub levels: PathBuf,

    /// Directory of monster sprite PNGs
    #[arg(long, default_value = "static/monsters")]
    pub sprites: PathBuf,

    /// URL prefix under which sprites are reachable
    #[arg(long, default_value = "/static/monsters")]
    pub sprite_url_prefix: String,

    /// Leaderboard JSON file
    #[arg(long, default_value = "leaderboard.json")]
    pub leaderboard: PathBuf,

    /// Keep the leaderboard in memory only
    #[arg(long)]
    pub memory_leaderboard: bool,

    /// Skip the flood-fill check after carving
    #[arg(long)]
    pub unverified_connectivity: bool,

    /// Let sequence words overwrite each other on the same wall cell
    #[arg(long)]
    pub sequence_with_replacement: bool,

    /// Generate a single maze, write it to --output and exit
    #[arg(long)]
    pub generate: bool,

    /// Maze width for --generate
    #[arg(short = 'W', long, default_value_t = word_maze::DEFAULT_WIDTH)]
    pub width: i64,

    /// Maze height for --generate
    #[arg(short = 'H', long, default_value_t = word_maze::DEFAULT_HEIGHT)]
    pub height: i64,

    /// Comma-separated vocabulary for --generate
    #[arg(long, value_delimiter = ',')]
    pub words: Vec<String>,

    /// Comma-separated collection sequence for --generate
    #[arg(long, value_delimiter = ',')]
    pub sequence: Vec<String>,

    /// RNG seed for --generate
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output path for --generate; use "-" for stdout
    #[arg(short, long, default_value = "-")]
    pub output: PathBuf,

    /// Replace the leaderboard with the demo score set and exit
    #[arg(long)]
    pub seed_leaderboard: bool,
}

impl Args {
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            connectivity: if self.unverified_connectivity {
                Connectivity::Forced
            } else {
                Connectivity::Verified
            },
            sequence_placement: if self.sequence_with_replacement {
                SequencePlacement::WithReplacement
            } else {
                SequencePlacement::Distinct
            },
        }
    }

    pub fn leaderboard_storage(&self) -> Storage {
        if self.memory_leaderboard {
            Storage::Memory
        } else {
            Storage::File(self.leaderboard.clone())
        }
    }
}

/// Everything the HTTP server needs, validated
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub static_dir: PathBuf,
    pub index_file: PathBuf,
    pub levels_file: PathBuf,
    pub sprite_dir: PathBuf,
    pub sprite_url_prefix: String,
    pub leaderboard: Storage,
    pub options: GenerationOptions,
}

impl ServerConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        Self::resolve(args, std::env::var("PORT").ok())
    }

    /// `env_port` is the raw PORT variable; an unparsable value falls back to `--port`
    pub fn resolve(args: &Args, env_port: Option<String>) -> Result<Self> {
        let ip: IpAddr = args.host.parse().map_err(|_| ServerError::InvalidConfig {
            reason: format!("'{}' is not an IP address", args.host),
        })?;

        let port = match env_port {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                log::warn!("Ignoring unparsable PORT '{}', using {}", raw, args.port);
                args.port
            }),
            None => args.port,
        };

        Ok(Self {
            addr: SocketAddr::new(ip, port),
            static_dir: args.static_dir.clone(),
            index_file: args.index.clone(),
            levels_file: args.levels.clone(),
            sprite_dir: args.sprites.clone(),
            sprite_url_prefix: args.sprite_url_prefix.trim_end_matches('/').to_string(),
            leaderboard: args.leaderboard_storage(),
            options: args.generation_options(),
        })
    }
}
