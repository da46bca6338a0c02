//! Compose subcommands and the argument vectors they expand to.

use std::fmt;

use sparklab_common::constants::WORKER_SERVICE;

/// A `docker compose` subcommand issued on behalf of a launcher command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeCommand {
    /// `build [--no-cache]`
    Build {
        /// Ignore the image layer cache.
        no_cache: bool,
    },
    /// `up [-d] [--build]`
    Up {
        /// Return once the services are started.
        detach: bool,
        /// Rebuild images before starting.
        build: bool,
    },
    /// `down [--volumes] [--rmi local] [--remove-orphans]`
    Down {
        /// Remove named and anonymous volumes.
        volumes: bool,
        /// Remove images built locally by the manifest.
        rmi_local: bool,
        /// Remove containers not defined in the manifest.
        remove_orphans: bool,
    },
    /// `restart [service]`
    Restart {
        /// Restrict to one service.
        service: Option<String>,
    },
    /// `logs [--follow] [--tail N] [service]`
    Logs {
        /// Stream new output.
        follow: bool,
        /// Number of trailing lines per container.
        tail: Option<u32>,
        /// Restrict to one service.
        service: Option<String>,
    },
    /// `ps`
    Ps,
    /// `up -d --no-recreate --scale spark-worker=N`
    Scale {
        /// Target number of worker containers.
        replicas: u32,
    },
}

impl ComposeCommand {
    /// Plain `down` with no extra cleanup.
    pub const DOWN: Self = Self::Down {
        volumes: false,
        rmi_local: false,
        remove_orphans: false,
    };

    /// Detached `up` without rebuilding.
    pub const UP: Self = Self::Up {
        detach: true,
        build: false,
    };

    /// Subcommand name as passed to compose.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Build { .. } => "build",
            Self::Up { .. } | Self::Scale { .. } => "up",
            Self::Down { .. } => "down",
            Self::Restart { .. } => "restart",
            Self::Logs { .. } => "logs",
            Self::Ps => "ps",
        }
    }

    /// Whether the command keeps running in the foreground until the user
    /// interrupts it.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        match self {
            Self::Up { detach, .. } => !*detach,
            Self::Logs { follow, .. } => *follow,
            _ => false,
        }
    }

    /// Arguments following the compose file options.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![self.name().to_string()];
        match self {
            Self::Build { no_cache } => {
                if *no_cache {
                    args.push("--no-cache".into());
                }
            }
            Self::Up { detach, build } => {
                if *detach {
                    args.push("-d".into());
                }
                if *build {
                    args.push("--build".into());
                }
            }
            Self::Down {
                volumes,
                rmi_local,
                remove_orphans,
            } => {
                if *volumes {
                    args.push("--volumes".into());
                }
                if *remove_orphans {
                    args.push("--remove-orphans".into());
                }
                if *rmi_local {
                    args.extend(["--rmi".into(), "local".into()]);
                }
            }
            Self::Restart { service } => args.extend(service.iter().cloned()),
            Self::Logs {
                follow,
                tail,
                service,
            } => {
                if *follow {
                    args.push("--follow".into());
                }
                if let Some(n) = tail {
                    args.extend(["--tail".into(), n.to_string()]);
                }
                args.extend(service.iter().cloned());
            }
            Self::Ps => {}
            Self::Scale { replicas } => {
                args.extend([
                    "-d".into(),
                    "--no-recreate".into(),
                    "--scale".into(),
                    format!("{WORKER_SERVICE}={replicas}"),
                ]);
            }
        }
        args
    }
}

impl fmt::Display for ComposeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.args().join(" "))
    }
}
