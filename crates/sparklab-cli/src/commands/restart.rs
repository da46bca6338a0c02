//! `sparklab restart` — Restart all services or one of them.

use clap::Args;

use super::Context;
use crate::output;

/// Arguments for the `restart` command.
#[derive(Args, Debug)]
pub struct RestartArgs {
    /// Service to restart (spark-master, spark-worker, jupyter).
    pub service: Option<String>,
}

/// Executes the `restart` command.
///
/// # Errors
///
/// Returns an error for an unknown service or a runtime failure.
pub fn execute(args: RestartArgs, ctx: &Context) -> anyhow::Result<()> {
    let engine = ctx.engine()?;
    let target = args.service.as_deref().unwrap_or("all services");
    output::step(&format!("Restarting {target}"));
    engine.restart(args.service.as_deref())?;
    output::success(&format!("Restarted {target}"));
    Ok(())
}
