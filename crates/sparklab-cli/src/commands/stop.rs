//! `sparklab stop` — Stop and remove the cluster containers.

use clap::Args;

use super::Context;
use crate::output;

/// Arguments for the `stop` command.
#[derive(Args, Debug)]
pub struct StopArgs {}

/// Executes the `stop` command.
///
/// # Errors
///
/// Returns an error if the artifacts are missing or teardown fails.
pub fn execute(_args: StopArgs, ctx: &Context) -> anyhow::Result<()> {
    let engine = ctx.engine()?;
    output::step("Stopping cluster");
    engine.stop()?;
    output::success("Cluster stopped");
    Ok(())
}
