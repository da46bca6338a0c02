//! `sparklab logs` — Show service logs.

use clap::Args;
use sparklab_runtime::LogOptions;

use super::{Context, run_attached};

/// Arguments for the `logs` command.
#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Service to show (spark-master, spark-worker, jupyter). All if omitted.
    pub service: Option<String>,

    /// Stream new output until Ctrl+C.
    #[arg(short, long)]
    pub follow: bool,

    /// Number of trailing lines per container.
    #[arg(short = 'n', long)]
    pub tail: Option<u32>,
}

/// Executes the `logs` command.
///
/// # Errors
///
/// Returns an error for an unknown service or a runtime failure.
pub fn execute(args: LogsArgs, ctx: &Context) -> anyhow::Result<()> {
    let engine = ctx.engine()?;
    let options = LogOptions {
        follow: args.follow,
        tail: args.tail,
        service: args.service,
    };
    if options.follow {
        return run_attached(|| engine.logs(options));
    }
    engine.logs(options)?;
    Ok(())
}
