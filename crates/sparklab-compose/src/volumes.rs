//! Host directories for the bind-mounted volumes.

use std::path::PathBuf;

use sparklab_common::config::ProjectLayout;
use sparklab_common::error::{Result, SparkLabError};

use crate::model::ClusterConfig;

/// Resolves a configured volume path against the project root. Absolute
/// paths are kept; `~` never reaches here because validation rejects it.
#[must_use]
pub fn resolve_host_dir(layout: &ProjectLayout, path: &str) -> PathBuf {
    let trimmed = path.trim_start_matches("./");
    layout.root.join(trimmed)
}

/// Creates the notebooks and data directories if they do not exist yet.
///
/// Returns the directories that were newly created.
///
/// # Errors
///
/// Returns [`SparkLabError::Io`] if a directory cannot be created.
pub fn prepare_volume_dirs(config: &ClusterConfig, layout: &ProjectLayout) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    for path in [&config.volumes.notebooks, &config.volumes.data] {
        let dir = resolve_host_dir(layout, path);
        if dir.is_dir() {
            continue;
        }
        std::fs::create_dir_all(&dir).map_err(|e| SparkLabError::io(&dir, e))?;
        tracing::info!(path = %dir.display(), "created volume directory");
        created.push(dir);
    }
    Ok(created)
}
