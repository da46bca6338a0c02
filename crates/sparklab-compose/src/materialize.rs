//! Materialization: configuration document in, two artifacts out.
//!
//! [`render`] is a pure function of the validated configuration.
//! [`write_artifacts`] stages both files as temporaries next to their
//! targets and only persists them once both are fully written. The env file
//! is persisted first; if the manifest then cannot be persisted, the previous
//! env file is put back (or the new one removed) before the error is
//! returned. That rollback is best effort and is logged when it fails.

use std::io::Write;
use std::path::Path;

use sparklab_common::config::ProjectLayout;
use sparklab_common::error::{Result, SparkLabError};
use tempfile::NamedTempFile;

use crate::env_file::EnvSettings;
use crate::manifest::Manifest;
use crate::model::ClusterConfig;
use crate::parser;

/// The two derived artifacts, fully rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// Structured environment settings.
    pub settings: EnvSettings,
    /// Structured compose manifest.
    pub manifest: Manifest,
    /// Rendered env file text.
    pub env_text: String,
    /// Rendered manifest text.
    pub manifest_text: String,
}

/// Renders both artifacts from a validated configuration.
///
/// # Errors
///
/// Returns an error only if YAML serialization of the manifest fails.
pub fn render(config: &ClusterConfig) -> Result<Artifacts> {
    let settings = EnvSettings::from_config(config);
    let manifest = Manifest::from_config(config);
    let env_text = settings.render();
    let manifest_text = manifest.render()?;
    Ok(Artifacts {
        settings,
        manifest,
        env_text,
        manifest_text,
    })
}

/// Loads the configuration named by `layout`, renders it and writes both
/// artifacts to their fixed locations.
///
/// # Errors
///
/// Returns a parse or validation error (nothing written) or an I/O error
/// naming the path that could not be written.
pub fn materialize(layout: &ProjectLayout) -> Result<Artifacts> {
    let config = parser::load_config(&layout.config_file)?;
    let artifacts = render(&config)?;
    write_artifacts(&artifacts, layout)?;
    tracing::info!(
        env = %layout.env_file.display(),
        manifest = %layout.manifest_file.display(),
        "artifacts materialized"
    );
    Ok(artifacts)
}

/// Writes both rendered artifacts, replacing any previous versions.
///
/// # Errors
///
/// Returns [`SparkLabError::Io`] if a directory cannot be created or a file
/// cannot be staged or persisted.
pub fn write_artifacts(artifacts: &Artifacts, layout: &ProjectLayout) -> Result<()> {
    let env = stage(&layout.env_file, artifacts.env_text.as_bytes())?;
    let manifest = stage(&layout.manifest_file, artifacts.manifest_text.as_bytes())?;
    let previous_env = read_existing(&layout.env_file)?;
    persist(env, &layout.env_file)?;
    if let Err(e) = persist(manifest, &layout.manifest_file) {
        restore(&layout.env_file, previous_env.as_deref());
        return Err(e);
    }
    Ok(())
}

fn read_existing(path: &Path) -> Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SparkLabError::io(path, e)),
    }
}

/// Puts `previous` back at `target`, or removes `target` if there was none.
fn restore(target: &Path, previous: Option<&[u8]>) {
    let outcome = match previous {
        Some(bytes) => stage(target, bytes).and_then(|file| persist(file, target)),
        None => std::fs::remove_file(target).map_err(|e| SparkLabError::io(target, e)),
    };
    match outcome {
        Ok(()) => tracing::debug!(path = %target.display(), "restored previous artifact"),
        Err(e) => tracing::warn!(
            path = %target.display(),
            error = %e,
            "could not restore previous artifact"
        ),
    }
}

fn stage(target: &Path, content: &[u8]) -> Result<NamedTempFile> {
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| SparkLabError::io(dir, e))?;
    let mut file = NamedTempFile::new_in(dir).map_err(|e| SparkLabError::io(dir, e))?;
    file.write_all(content)
        .and_then(|()| file.as_file().sync_all())
        .map_err(|e| SparkLabError::io(target, e))?;
    tracing::debug!(path = %target.display(), bytes = content.len(), "staged artifact");
    Ok(file)
}

fn persist(file: NamedTempFile, target: &Path) -> Result<()> {
    let _ = file
        .persist(target)
        .map_err(|e| SparkLabError::io(target, e.error))?;
    Ok(())
}

/// Deletes the generated artifacts. Missing files are not an error.
///
/// Returns the paths that were actually removed.
///
/// # Errors
///
/// Returns [`SparkLabError::Io`] if an existing artifact cannot be removed.
pub fn remove_artifacts(layout: &ProjectLayout) -> Result<Vec<std::path::PathBuf>> {
    let mut removed = Vec::new();
    for path in layout.artifact_paths() {
        match std::fs::remove_file(path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed artifact");
                removed.push(path.to_path_buf());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(SparkLabError::io(path, e)),
        }
    }
    Ok(removed)
}

/// Returns `true` if both artifacts exist on disk.
#[must_use]
pub fn artifacts_present(layout: &ProjectLayout) -> bool {
    layout.artifact_paths().iter().all(|p| p.is_file())
}
