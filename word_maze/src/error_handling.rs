// error_handling.rs - Error type for maze generation

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

impl MazeError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        MazeError::InvalidArgument {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MazeError>;
