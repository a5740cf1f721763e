// sprites.rs - Monster sprite catalog built from a directory listing

use std::path::Path;

use crate::error_handling::{Result, ServerError};

/// URLs of every `.png` in `dir`, sorted by file name
pub async fn list_monster_sprites(dir: &Path, url_prefix: &str) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ServerError::io(dir, e))?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ServerError::io(dir, e))?
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".png") {
            names.push(name);
        }
    }
    names.sort();

    let prefix = url_prefix.trim_end_matches('/');
    Ok(names.into_iter().map(|n| format!("{prefix}/{n}")).collect())
}
