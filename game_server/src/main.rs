// main.rs - Word maze game backend: HTTP server, one-shot maze generation, leaderboard seeding

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::Path;

use game_server::config::{Args, ServerConfig};
use game_server::http_server;
use game_server::leaderboard::{demo_data, Leaderboard};
use word_maze::{MazeRequest, MazeResult};

/// Generate one maze from CLI flags
fn generate_once(args: &Args) -> Result<MazeResult> {
    let request = MazeRequest {
        width: args.width,
        height: args.height,
        words: args.words.clone(),
        word_sequence: args.sequence.clone(),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let maze = word_maze::generate_maze(&request, &args.generation_options(), &mut rng)
        .context("Maze generation failed")?;
    Ok(maze)
}

async fn write_output(path: &Path, maze: &MazeResult) -> Result<()> {
    let json = serde_json::to_string_pretty(maze).context("Failed to serialize maze")?;
    if path == Path::new("-") {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{json}").context("Failed to write maze to stdout")?;
    } else {
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Maze written to {}", path.display());
    }
    Ok(())
}

async fn seed_leaderboard(args: &Args) -> Result<()> {
    let board = Leaderboard::open(args.leaderboard_storage())
        .await
        .context("Failed to open leaderboard")?;
    let data = demo_data(chrono::Local::now().naive_local());
    let count = data.all_time.len();
    board
        .replace(data)
        .await
        .context("Failed to write seeded leaderboard")?;
    info!("Leaderboard seeded with {} entries", count);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    info!("Starting with {args:?}");

    if args.seed_leaderboard {
        return seed_leaderboard(&args).await;
    }

    if args.generate {
        let maze = generate_once(&args)?;
        info!(
            "Generated {}x{} maze, {} monsters",
            maze.width,
            maze.height,
            maze.monsters.len()
        );
        return write_output(&args.output, &maze).await;
    }

    let config = ServerConfig::from_args(&args).context("Invalid server configuration")?;
    http_server::start_server(config).await
}
