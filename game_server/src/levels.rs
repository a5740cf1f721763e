// levels.rs - Level text source
//
// The file is passed through untouched; its layout (word lists, narrative
// text per level) belongs to the frontend.

use std::path::Path;

use crate::error_handling::{Result, ServerError};

pub async fn load_levels(path: &Path) -> Result<serde_json::Value> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ServerError::io(path, e))?;
    let levels = serde_json::from_str(&raw)?;
    log::debug!("Loaded levels from {}", path.display());
    Ok(levels)
}
