// game_server/src/http_server.rs
use std::convert::Infallible;
use std::sync::Arc;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};
use word_maze::MazeRequest;

use crate::config::ServerConfig;
use crate::error_handling::ServerError;
use crate::leaderboard::{Leaderboard, ScoreSubmission};
use crate::{levels, sprites};

const MAX_BODY_BYTES: u64 = 64 * 1024;

// ============= Request/Response Models =============

#[derive(Debug, Deserialize)]
pub struct GenerateMazeRequest {
    #[serde(flatten)]
    pub maze: MazeRequest,
    /// Fixed seed for reproducible mazes; fresh entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
}

// ============= Custom Error Handling =============

#[derive(Debug)]
struct ServiceError {
    message: String,
    status_code: StatusCode,
}

impl warp::reject::Reject for ServiceError {}

impl From<ServerError> for ServiceError {
    fn from(err: ServerError) -> Self {
        Self {
            status_code: err.status_code(),
            message: err.to_string(),
        }
    }
}

fn reject(err: ServerError) -> Rejection {
    let service_err = ServiceError::from(err);
    if service_err.status_code.is_server_error() {
        log::error!("Request failed: {}", service_err.message);
    } else {
        log::debug!("Request rejected: {}", service_err.message);
    }
    warp::reject::custom(service_err)
}

async fn handle_rejection(err: Rejection) -> std::result::Result<impl Reply, Infallible> {
    let code;
    let message: String;

    if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "Not Found".into();
    } else if let Some(service_err) = err.find::<ServiceError>() {
        code = service_err.status_code;
        message = service_err.message.clone();
    } else if let Some(body_err) = err.find::<warp::filters::body::BodyDeserializeError>() {
        code = StatusCode::BAD_REQUEST;
        message = format!("Invalid request body: {}", body_err);
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".into();
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        code = StatusCode::PAYLOAD_TOO_LARGE;
        message = "Payload too large".into();
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        code = StatusCode::UNSUPPORTED_MEDIA_TYPE;
        message = "Expected a JSON body".into();
    } else if err.find::<warp::cors::CorsForbidden>().is_some() {
        code = StatusCode::FORBIDDEN;
        message = "Origin not allowed".into();
    } else {
        log::error!("unhandled rejection: {:?}", err);
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".into();
    }

    let json = warp::reply::json(&serde_json::json!({
        "error": message,
        "status_code": code.as_u16(),
    }));

    Ok(warp::reply::with_status(json, code))
}

// ============= Shared State =============

#[derive(Clone)]
pub struct ServerState {
    config: Arc<ServerConfig>,
    leaderboard: Arc<Leaderboard>,
}

impl ServerState {
    pub async fn new(config: ServerConfig) -> crate::error_handling::Result<Self> {
        let leaderboard = Leaderboard::open(config.leaderboard.clone()).await?;
        Ok(Self::with_leaderboard(config, leaderboard))
    }

    pub fn with_leaderboard(config: ServerConfig, leaderboard: Leaderboard) -> Self {
        Self {
            config: Arc::new(config),
            leaderboard: Arc::new(leaderboard),
        }
    }
}

// ============= CORS Configuration =============

fn with_cors() -> warp::cors::Builder {
    warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["Accept", "Content-Type", "X-Requested-With"])
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .max_age(3600)
}

// ============= Middleware & Filters =============

fn with_state(state: ServerState) -> impl Filter<Extract = (ServerState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

// ============= Request Handlers =============

async fn handle_health() -> std::result::Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "word-maze-server",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

async fn handle_levels(state: ServerState) -> std::result::Result<impl Reply, Rejection> {
    let levels = levels::load_levels(&state.config.levels_file)
        .await
        .map_err(reject)?;
    Ok(warp::reply::json(&levels))
}

async fn handle_sprites(state: ServerState) -> std::result::Result<impl Reply, Rejection> {
    let sprites = sprites::list_monster_sprites(&state.config.sprite_dir, &state.config.sprite_url_prefix)
        .await
        .map_err(reject)?;
    Ok(warp::reply::json(&sprites))
}

async fn handle_leaderboard(state: ServerState) -> std::result::Result<impl Reply, Rejection> {
    let standings = state.leaderboard.standings().await;
    Ok(warp::reply::json(&standings))
}

async fn handle_submit(
    submission: ScoreSubmission,
    state: ServerState,
) -> std::result::Result<impl Reply, Rejection> {
    state.leaderboard.submit(submission).await.map_err(reject)?;
    Ok(warp::reply::json(&SubmitResponse { success: true }))
}

async fn handle_generate(
    request: GenerateMazeRequest,
    state: ServerState,
) -> std::result::Result<impl Reply, Rejection> {
    let options = state.config.options;

    // Carving is CPU-bound; keep it off the async workers
    let maze = tokio::task::spawn_blocking(move || {
        let mut rng = match request.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        word_maze::generate_maze(&request.maze, &options, &mut rng)
    })
    .await
    .map_err(|e| reject(e.into()))?
    .map_err(|e| reject(e.into()))?;

    log::info!(
        "Generated {}x{} maze with {} monsters",
        maze.width,
        maze.height,
        maze.monsters.len()
    );
    Ok(warp::reply::json(&maze))
}

// ============= Routes =============

pub fn routes(state: ServerState) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let index = warp::path::end()
        .and(warp::get())
        .and(warp::fs::file(state.config.index_file.clone()));

    let static_files = warp::path("static").and(warp::fs::dir(state.config.static_dir.clone()));

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handle_health);

    let get_levels = warp::path("get_levels")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handle_levels);

    let get_sprites = warp::path("get_monster_sprites")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handle_sprites);

    let get_leaderboard = warp::path("get_leaderboard")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handle_leaderboard);

    let submit_score = warp::path("submit_score")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body::<ScoreSubmission>())
        .and(with_state(state.clone()))
        .and_then(handle_submit);

    let generate_maze = warp::path("generate_maze")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body::<GenerateMazeRequest>())
        .and(with_state(state))
        .and_then(handle_generate);

    index
        .or(static_files)
        .or(health)
        .or(get_levels)
        .or(get_sprites)
        .or(get_leaderboard)
        .or(submit_score)
        .or(generate_maze)
        .with(with_cors())
        .recover(handle_rejection)
        .with(warp::log("game_server"))
}

// ============= Server Initialization =============

pub async fn start_server(config: ServerConfig) -> Result<()> {
    let addr = config.addr;
    let state = ServerState::new(config)
        .await
        .context("Failed to open leaderboard")?;

    log::info!("Starting word maze HTTP server on {}", addr);
    warp::serve(routes(state)).run(addr).await;

    Ok(())
}
