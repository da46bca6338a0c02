//! `sparklab status` — Show service status.

use clap::Args;

use super::Context;

/// Arguments for the `status` command.
#[derive(Args, Debug)]
pub struct StatusArgs {}

/// Executes the `status` command.
///
/// # Errors
///
/// Returns an error if the artifacts are missing or the query fails.
pub fn execute(_args: StatusArgs, ctx: &Context) -> anyhow::Result<()> {
    ctx.engine()?.status()?;
    Ok(())
}
