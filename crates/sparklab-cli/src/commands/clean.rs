//! `sparklab clean` — Tear down everything the launcher created.

use clap::Args;
use sparklab_compose::materialize;

use super::Context;
use crate::output;

/// Arguments for the `clean` command.
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Keep the generated env file and compose manifest.
    #[arg(long)]
    pub keep_artifacts: bool,
}

/// Executes the `clean` command.
///
/// Notebooks and data directories are never touched.
///
/// # Errors
///
/// Returns an error if teardown fails or an artifact cannot be removed.
pub fn execute(args: CleanArgs, ctx: &Context) -> anyhow::Result<()> {
    if materialize::artifacts_present(&ctx.layout) {
        let engine = ctx.engine()?;
        output::step("Removing containers, volumes and local images");
        engine.clean()?;
        output::success("Cluster removed");
    } else {
        output::warn("no generated manifest found, skipping container cleanup");
    }

    if args.keep_artifacts {
        return Ok(());
    }
    for path in materialize::remove_artifacts(&ctx.layout)? {
        output::success(&format!("Removed {}", path.display()));
    }
    Ok(())
}
