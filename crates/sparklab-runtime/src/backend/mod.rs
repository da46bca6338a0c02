//! Compose front-end abstraction.

pub mod docker;

use std::path::Path;

use sparklab_common::error::{Result, SparkLabError};

pub use docker::DockerCompose;

/// Something that can execute `docker compose` style argument vectors.
///
/// Implementors run the front end with the launcher's terminal attached and
/// report a non-zero exit as [`SparkLabError::Runtime`].
pub trait ComposeBackend: Send + Sync {
    /// Runs the front end with `args` and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exits non-zero.
    fn run(&self, args: &[String]) -> Result<()>;

    /// Human-readable name of the front end, e.g. `docker compose`.
    fn describe(&self) -> String;
}

/// Detects the compose front end to delegate to.
///
/// An explicit `docker` binary always selects the plugin form
/// (`<docker> compose`). Otherwise the `docker compose` plugin is preferred
/// and the standalone `docker-compose` binary is the fallback.
///
/// # Errors
///
/// Returns [`SparkLabError::NotFound`] if neither front end is installed.
pub fn detect_backend(docker: Option<&Path>) -> Result<Box<dyn ComposeBackend>> {
    if let Some(path) = docker {
        tracing::debug!(docker = %path.display(), "using configured docker binary");
        return Ok(Box::new(DockerCompose::plugin(path)));
    }

    if let Ok(path) = which::which("docker") {
        if docker::plugin_available(&path) {
            tracing::debug!(docker = %path.display(), "detected docker compose plugin");
            return Ok(Box::new(DockerCompose::plugin(path)));
        }
        tracing::debug!("docker found without the compose plugin");
    }

    if let Ok(path) = which::which("docker-compose") {
        tracing::debug!(binary = %path.display(), "detected standalone docker-compose");
        return Ok(Box::new(DockerCompose::standalone(path)));
    }

    Err(SparkLabError::NotFound {
        kind: "container runtime",
        id: "docker compose (install Docker or pass --docker <path>)".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_binary_selects_plugin_form() {
        let backend = detect_backend(Some(Path::new("/opt/docker/bin/docker"))).unwrap();
        assert_eq!(backend.describe(), "/opt/docker/bin/docker compose");
    }
}
