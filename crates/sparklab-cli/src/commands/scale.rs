//! `sparklab scale` — Change the number of worker containers.

use clap::Args;

use super::Context;
use crate::output;

/// Arguments for the `scale` command.
#[derive(Args, Debug)]
pub struct ScaleArgs {
    /// Target number of workers.
    pub workers: u32,
}

/// Executes the `scale` command.
///
/// The manifest publishes one worker UI port per configured instance, so
/// scaling above `spark.worker.instances` runs out of host ports. The
/// command warns in that case and lets the runtime decide.
///
/// # Errors
///
/// Returns an error for zero workers or a runtime failure.
pub fn execute(args: ScaleArgs, ctx: &Context) -> anyhow::Result<()> {
    match sparklab_compose::load_config(&ctx.layout.config_file) {
        Ok(config) if args.workers > config.spark.worker_instances => {
            output::warn(&format!(
                "{} workers exceed spark.worker.instances ({}); raise it and run `{} generate` \
                 so each worker gets a UI port",
                args.workers,
                config.spark.worker_instances,
                sparklab_common::constants::BIN_NAME
            ));
        }
        Ok(_) => {}
        Err(e) => tracing::debug!(error = %e, "cannot compare against configured instances"),
    }

    let engine = ctx.engine()?;
    output::step(&format!("Scaling workers to {}", args.workers));
    engine.scale(args.workers)?;
    output::success(&format!("Running {} worker(s)", args.workers));
    Ok(())
}
