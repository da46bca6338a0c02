//! `sparklab start` — Start the cluster.

use clap::Args;
use sparklab_runtime::StartOptions;

use super::{Context, run_attached};
use crate::output;

/// Arguments for the `start` command.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Stay in the foreground streaming service output (Ctrl+C to detach).
    #[arg(short, long)]
    pub attach: bool,

    /// Rebuild images before starting.
    #[arg(long)]
    pub build: bool,
}

/// Executes the `start` command.
///
/// # Errors
///
/// Returns an error if the artifacts are missing or startup fails.
pub fn execute(args: StartArgs, ctx: &Context) -> anyhow::Result<()> {
    let engine = ctx.engine()?;
    let options = StartOptions {
        attach: args.attach,
        build: args.build,
    };

    output::step("Starting cluster");
    if args.attach {
        return run_attached(|| engine.start(options));
    }
    engine.start(options)?;
    output::success("Cluster started");

    match sparklab_compose::load_config(&ctx.layout.config_file) {
        Ok(config) => output::service_urls(config.ports),
        Err(e) => tracing::debug!(error = %e, "skipping service URLs"),
    }
    Ok(())
}
