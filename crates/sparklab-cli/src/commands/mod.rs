//! CLI command definitions and dispatch.

pub mod build;
pub mod clean;
pub mod config;
pub mod generate;
pub mod logs;
pub mod rebuild;
pub mod restart;
pub mod scale;
pub mod start;
pub mod status;
pub mod stop;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{Parser, Subcommand, ValueEnum};
use sparklab_common::config::ProjectLayout;
use sparklab_common::error::SparkLabError;
use sparklab_runtime::Engine;

/// sparklab — Spark + Jupyter cluster launcher.
#[derive(Parser, Debug)]
#[command(name = "sparklab", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Project root containing `config/` and `docker/`.
    #[arg(long, global = true, env = "SPARKLAB_PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Configuration document [default: <project-dir>/config/config.yaml].
    #[arg(long, global = true, env = "SPARKLAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Docker binary to invoke as `<docker> compose`.
    #[arg(long, global = true, env = "SPARKLAB_DOCKER")]
    pub docker: Option<PathBuf>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the env file and compose manifest from config.yaml.
    Generate(generate::GenerateArgs),
    /// Show the resolved configuration.
    Config(config::ConfigArgs),
    /// Build the service images.
    Build(build::BuildArgs),
    /// Start the cluster.
    Start(start::StartArgs),
    /// Stop and remove the cluster containers.
    Stop(stop::StopArgs),
    /// Restart all services or a single one.
    Restart(restart::RestartArgs),
    /// Show service logs.
    Logs(logs::LogsArgs),
    /// Show service status.
    Status(status::StatusArgs),
    /// Remove containers, volumes, local images and generated files.
    Clean(clean::CleanArgs),
    /// Regenerate, rebuild from scratch and start.
    Rebuild(rebuild::RebuildArgs),
    /// Change the number of worker containers.
    Scale(scale::ScaleArgs),
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Resolved project file locations.
    pub layout: ProjectLayout,
    /// Explicit docker binary, if any.
    pub docker: Option<PathBuf>,
}

impl Context {
    fn from_cli(cli: &Cli) -> Self {
        let layout = ProjectLayout::for_root(&cli.project_dir);
        let layout = match &cli.config {
            Some(path) => layout.with_config_file(path),
            None => layout,
        };
        Self {
            layout,
            docker: cli.docker.clone(),
        }
    }

    /// Creates a runtime engine for this project.
    ///
    /// # Errors
    ///
    /// Returns an error if no compose front end is installed.
    pub fn engine(&self) -> anyhow::Result<Engine> {
        let engine = Engine::new(self.layout.clone(), self.docker.as_deref())?;
        tracing::debug!(backend = %engine.backend_name(), "compose front end");
        Ok(engine)
    }
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::from_cli(&cli);
    match cli.command {
        Command::Generate(args) => generate::execute(args, &ctx),
        Command::Config(args) => config::execute(args, &ctx),
        Command::Build(args) => build::execute(args, &ctx),
        Command::Start(args) => start::execute(args, &ctx),
        Command::Stop(args) => stop::execute(args, &ctx),
        Command::Restart(args) => restart::execute(args, &ctx),
        Command::Logs(args) => logs::execute(args, &ctx),
        Command::Status(args) => status::execute(args, &ctx),
        Command::Clean(args) => clean::execute(args, &ctx),
        Command::Rebuild(args) => rebuild::execute(args, &ctx),
        Command::Scale(args) => scale::execute(args, &ctx),
    }
}

/// Runs a foreground runtime command that the user ends with Ctrl+C.
///
/// The interrupt reaches the child through the terminal; the launcher stays
/// alive until the child exits and treats that exit as success.
///
/// # Errors
///
/// Returns the runtime error if the child failed without an interrupt.
pub fn run_attached(
    f: impl FnOnce() -> sparklab_common::error::Result<()>,
) -> anyhow::Result<()> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {e}"))?;

    match f() {
        Err(SparkLabError::Runtime { .. }) if interrupted.load(Ordering::SeqCst) => {
            tracing::debug!("runtime exited after interrupt");
            Ok(())
        }
        other => other.map_err(Into::into),
    }
}
