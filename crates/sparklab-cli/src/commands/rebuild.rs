//! `sparklab rebuild` — Regenerate, rebuild from scratch and start.

use clap::Args;

use super::Context;
use crate::output;

/// Arguments for the `rebuild` command.
#[derive(Args, Debug)]
pub struct RebuildArgs {}

/// Executes the `rebuild` command.
///
/// # Errors
///
/// Returns the first configuration or runtime failure. A configuration
/// error leaves the running cluster untouched.
pub fn execute(_args: RebuildArgs, ctx: &Context) -> anyhow::Result<()> {
    let engine = ctx.engine()?;
    output::step("Regenerating and rebuilding cluster");
    engine.rebuild()?;
    output::success("Cluster rebuilt and started");
    Ok(())
}
