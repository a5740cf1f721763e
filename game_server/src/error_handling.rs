// error_handling.rs - Error type shared by the collaborators and HTTP handlers

use thiserror::Error;
use warp::http::StatusCode;
use word_maze::MazeError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O failed on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error(transparent)]
    Maze(#[from] MazeError),

    #[error("Background task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl ServerError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        ServerError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Status code a handler should answer with for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Maze(MazeError::InvalidArgument { .. }) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
