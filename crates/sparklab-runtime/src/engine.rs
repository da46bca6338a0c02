//! Runtime engine that maps launcher commands onto compose invocations.

use std::path::Path;

use sparklab_common::config::ProjectLayout;
use sparklab_common::constants::{BIN_NAME, JUPYTER_SERVICE, MASTER_SERVICE, WORKER_SERVICE};
use sparklab_common::error::{Result, SparkLabError};

use crate::backend::{self, ComposeBackend};
use crate::command::ComposeCommand;

/// Service names defined by the generated manifest.
pub const SERVICES: [&str; 3] = [MASTER_SERVICE, WORKER_SERVICE, JUPYTER_SERVICE];

/// Options for [`Engine::start`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartOptions {
    /// Stay in the foreground streaming service output.
    pub attach: bool,
    /// Rebuild images before starting.
    pub build: bool,
}

/// Options for [`Engine::logs`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Stream new output until interrupted.
    pub follow: bool,
    /// Number of trailing lines per container.
    pub tail: Option<u32>,
    /// Restrict to one service.
    pub service: Option<String>,
}

/// The runtime engine that coordinates all cluster operations.
///
/// Every operation runs against the generated artifacts of one project and
/// fails early if they are missing.
pub struct Engine {
    backend: Box<dyn ComposeBackend>,
    layout: ProjectLayout,
}

impl Engine {
    /// Creates an engine with an auto-detected compose front end.
    ///
    /// # Errors
    ///
    /// Returns [`SparkLabError::NotFound`] if no front end is installed.
    pub fn new(layout: ProjectLayout, docker: Option<&Path>) -> Result<Self> {
        Ok(Self::with_backend(backend::detect_backend(docker)?, layout))
    }

    /// Creates an engine with an explicit backend.
    #[must_use]
    pub fn with_backend(backend: Box<dyn ComposeBackend>, layout: ProjectLayout) -> Self {
        Self { backend, layout }
    }

    /// Returns the project layout the engine operates on.
    #[must_use]
    pub const fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Human-readable name of the compose front end in use.
    #[must_use]
    pub fn backend_name(&self) -> String {
        self.backend.describe()
    }

    /// Builds the service images.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifacts are missing or the build fails.
    pub fn build(&self, no_cache: bool) -> Result<()> {
        self.invoke(&ComposeCommand::Build { no_cache })
    }

    /// Starts the cluster.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifacts are missing or startup fails.
    pub fn start(&self, options: StartOptions) -> Result<()> {
        self.invoke(&ComposeCommand::Up {
            detach: !options.attach,
            build: options.build,
        })
    }

    /// Stops and removes the cluster containers and network.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifacts are missing or teardown fails.
    pub fn stop(&self) -> Result<()> {
        self.invoke(&ComposeCommand::DOWN)
    }

    /// Restarts every service, or only `service`.
    ///
    /// # Errors
    ///
    /// Returns [`SparkLabError::NotFound`] for an unknown service, otherwise
    /// any runtime failure.
    pub fn restart(&self, service: Option<&str>) -> Result<()> {
        let service = service.map(check_service).transpose()?;
        self.invoke(&ComposeCommand::Restart { service })
    }

    /// Shows service output.
    ///
    /// # Errors
    ///
    /// Returns [`SparkLabError::NotFound`] for an unknown service, otherwise
    /// any runtime failure.
    pub fn logs(&self, options: LogOptions) -> Result<()> {
        let service = options.service.as_deref().map(check_service).transpose()?;
        self.invoke(&ComposeCommand::Logs {
            follow: options.follow,
            tail: options.tail,
            service,
        })
    }

    /// Lists the service containers and their state.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifacts are missing or the query fails.
    pub fn status(&self) -> Result<()> {
        self.invoke(&ComposeCommand::Ps)
    }

    /// Tears the cluster down together with its volumes, orphans and
    /// locally built images.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifacts are missing or teardown fails.
    pub fn clean(&self) -> Result<()> {
        self.invoke(&ComposeCommand::Down {
            volumes: true,
            rmi_local: true,
            remove_orphans: true,
        })
    }

    /// Regenerates the artifacts and recreates the cluster from fresh images.
    ///
    /// A configuration error aborts before any container is touched.
    ///
    /// # Errors
    ///
    /// Returns the first materialization or runtime failure.
    pub fn rebuild(&self) -> Result<()> {
        let _ = sparklab_compose::materialize(&self.layout)?;
        self.invoke(&ComposeCommand::DOWN)?;
        self.invoke(&ComposeCommand::Build { no_cache: true })?;
        self.invoke(&ComposeCommand::UP)
    }

    /// Sets the number of worker containers without recreating running ones.
    ///
    /// # Errors
    ///
    /// Returns [`SparkLabError::InvalidField`] for zero replicas, otherwise
    /// any runtime failure.
    pub fn scale(&self, replicas: u32) -> Result<()> {
        if replicas == 0 {
            return Err(SparkLabError::InvalidField {
                path: "spark.worker.instances",
                what: "worker count",
                message: "must be at least 1".into(),
            });
        }
        self.invoke(&ComposeCommand::Scale { replicas })
    }

    /// Runs one compose subcommand against the project's artifacts.
    ///
    /// # Errors
    ///
    /// Returns [`SparkLabError::NotFound`] if an artifact is missing, or the
    /// backend's error.
    pub fn invoke(&self, command: &ComposeCommand) -> Result<()> {
        self.ensure_artifacts()?;
        tracing::info!(command = %command, "compose");
        self.backend.run(&self.argv(command))
    }

    /// Full argument vector for `command`, including the file options.
    #[must_use]
    pub fn argv(&self, command: &ComposeCommand) -> Vec<String> {
        let mut argv = vec![
            "-f".to_string(),
            self.layout.manifest_file.display().to_string(),
            "--env-file".to_string(),
            self.layout.env_file.display().to_string(),
        ];
        argv.extend(command.args());
        argv
    }

    fn ensure_artifacts(&self) -> Result<()> {
        for path in self.layout.artifact_paths() {
            if !path.is_file() {
                return Err(SparkLabError::NotFound {
                    kind: "generated artifact",
                    id: format!("{} (run `{BIN_NAME} generate` first)", path.display()),
                });
            }
        }
        Ok(())
    }
}

fn check_service(name: &str) -> Result<String> {
    if SERVICES.contains(&name) {
        Ok(name.to_string())
    } else {
        Err(SparkLabError::NotFound {
            kind: "service",
            id: format!("{name} (expected one of: {})", SERVICES.join(", ")),
        })
    }
}
