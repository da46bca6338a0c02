//! `sparklab config` — Show the resolved configuration.

use clap::{Args, ValueEnum};
use sparklab_compose::ClusterConfig;
use sparklab_compose::model::Resources;

use super::Context;
use crate::output;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = ConfigFormat::Table)]
    pub format: ConfigFormat,
}

/// Output format for the resolved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// Grouped, aligned summary.
    Table,
    /// YAML document with every default filled in.
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

/// Executes the `config` command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or cannot be rendered.
pub fn execute(args: ConfigArgs, ctx: &Context) -> anyhow::Result<()> {
    let config = sparklab_compose::load_config(&ctx.layout.config_file)?;
    output::stdout(&render(&config, args.format)?)?;
    Ok(())
}

fn render(config: &ClusterConfig, format: ConfigFormat) -> anyhow::Result<String> {
    Ok(match format {
        ConfigFormat::Table => table(config),
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
        ConfigFormat::Json => {
            let mut text = serde_json::to_string_pretty(config)?;
            text.push('\n');
            text
        }
    })
}

fn table(config: &ClusterConfig) -> String {
    let spark = &config.spark;
    let ports = config.ports;
    let worker_ui = if spark.worker_instances > 1 {
        let last = u32::from(ports.worker_ui) + spark.worker_instances - 1;
        format!("{}-{last}", ports.worker_ui)
    } else {
        ports.worker_ui.to_string()
    };
    let packages = if config.python.packages.is_empty() {
        "(none)".to_string()
    } else {
        config.python.requirements()
    };

    let row = |k: &str, v: String| (k.to_string(), v);
    output::format_table([
        (
            "Spark",
            vec![
                row("version", spark.version.clone()),
                row("image", spark.image_ref()),
                row("master", resources(&spark.master)),
                row("workers", spark.worker_instances.to_string()),
                row("worker", resources(&spark.worker)),
                row("executor", resources(&spark.executor)),
            ],
        ),
        (
            "Python",
            vec![
                row("version", config.python.version.clone()),
                row("packages", packages),
            ],
        ),
        (
            "Ports",
            vec![
                row("jupyter", ports.jupyter.to_string()),
                row("master ui", ports.master_ui.to_string()),
                row("master", ports.master.to_string()),
                row("worker ui", worker_ui),
            ],
        ),
        (
            "Volumes",
            vec![
                row("notebooks", config.volumes.notebooks.clone()),
                row("data", config.volumes.data.clone()),
            ],
        ),
        ("Network", vec![row("name", config.network.clone())]),
    ])
}

fn resources(r: &Resources) -> String {
    let cores = if r.cores == 1 { "core" } else { "cores" };
    match r.memory.bytes() {
        Some(bytes) => format!(
            "{} ({}), {} {cores}",
            r.memory,
            output::format_bytes(bytes),
            r.cores
        ),
        None => format!("{}, {} {cores}", r.memory, r.cores),
    }
}
