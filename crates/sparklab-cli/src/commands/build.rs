//! `sparklab build` — Build the service images.

use clap::Args;

use super::Context;
use crate::output;

/// Arguments for the `build` command.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Ignore the image layer cache.
    #[arg(long)]
    pub no_cache: bool,
}

/// Executes the `build` command.
///
/// # Errors
///
/// Returns an error if the artifacts are missing or the build fails.
pub fn execute(args: BuildArgs, ctx: &Context) -> anyhow::Result<()> {
    let engine = ctx.engine()?;
    output::step("Building images");
    engine.build(args.no_cache)?;
    output::success("Images built");
    Ok(())
}
