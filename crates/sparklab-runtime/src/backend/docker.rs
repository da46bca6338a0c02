//! Process-spawning compose backend.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use sparklab_common::error::{Result, SparkLabError};

use super::ComposeBackend;

/// Runs `docker compose` (plugin) or `docker-compose` (standalone) as a
/// child process sharing the launcher's stdio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerCompose {
    program: PathBuf,
    plugin: bool,
}

impl DockerCompose {
    /// Front end invoked as `<docker> compose ...`.
    #[must_use]
    pub fn plugin(docker: impl Into<PathBuf>) -> Self {
        Self {
            program: docker.into(),
            plugin: true,
        }
    }

    /// Front end invoked as `<docker-compose> ...`.
    #[must_use]
    pub fn standalone(binary: impl Into<PathBuf>) -> Self {
        Self {
            program: binary.into(),
            plugin: false,
        }
    }

    /// Full argument vector handed to the program.
    #[must_use]
    pub fn argv(&self, args: &[String]) -> Vec<String> {
        let mut argv = Vec::with_capacity(args.len() + 1);
        if self.plugin {
            argv.push("compose".to_string());
        }
        argv.extend(args.iter().cloned());
        argv
    }
}

impl ComposeBackend for DockerCompose {
    fn run(&self, args: &[String]) -> Result<()> {
        let argv = self.argv(args);
        let command_line = format!("{} {}", self.program.display(), argv.join(" "));
        tracing::info!(command = %command_line, "delegating to container runtime");

        let status = Command::new(&self.program)
            .args(&argv)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| SparkLabError::io(&self.program, e))?;

        if status.success() {
            Ok(())
        } else {
            tracing::debug!(code = ?status.code(), "container runtime failed");
            Err(SparkLabError::Runtime {
                command: command_line,
                code: status.code(),
            })
        }
    }

    fn describe(&self) -> String {
        if self.plugin {
            format!("{} compose", self.program.display())
        } else {
            self.program.display().to_string()
        }
    }
}

/// Returns `true` if `<docker> compose version` succeeds.
pub(crate) fn plugin_available(docker: &Path) -> bool {
    Command::new(docker)
        .args(["compose", "version"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}
