//! `sparklab generate` — Materialize the env file and compose manifest.

use clap::Args;
use sparklab_compose::volumes;

use super::Context;
use crate::output;

/// Arguments for the `generate` command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Do not create the notebooks and data directories.
    #[arg(long)]
    pub skip_volumes: bool,
}

/// Executes the `generate` command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a file cannot be
/// written. Nothing is written for an invalid configuration.
pub fn execute(args: GenerateArgs, ctx: &Context) -> anyhow::Result<()> {
    output::header();
    output::step(&format!("Reading {}", ctx.layout.config_file.display()));
    let config = sparklab_compose::load_config(&ctx.layout.config_file).inspect_err(|e| {
        if e.is_input_error() {
            output::warn("configuration rejected, existing artifacts left unchanged");
        }
    })?;
    let artifacts = sparklab_compose::render(&config)?;
    sparklab_compose::write_artifacts(&artifacts, &ctx.layout)?;

    output::success(&format!("Wrote {}", ctx.layout.env_file.display()));
    output::success(&format!("Wrote {}", ctx.layout.manifest_file.display()));

    if !args.skip_volumes {
        for dir in volumes::prepare_volume_dirs(&config, &ctx.layout)? {
            output::detail(&format!("created {}", dir.display()));
        }
    }

    output::hint(&format!(
        "Run {}{} start{} to launch the cluster.",
        output::BOLD,
        sparklab_common::constants::BIN_NAME,
        output::RESET
    ));
    Ok(())
}
