//! Environment settings artifact (`config/.env`).
//!
//! A flat list of `KEY=value` lines grouped under comment headers. Key order
//! is fixed so identical configurations render byte-identical files.

use std::fmt::Write as _;

use crate::model::ClusterConfig;

/// Spark image tag.
pub const SPARK_VERSION: &str = "SPARK_VERSION";
/// Master memory.
pub const SPARK_MASTER_MEMORY: &str = "SPARK_MASTER_MEMORY";
/// Master cores.
pub const SPARK_MASTER_CORES: &str = "SPARK_MASTER_CORES";
/// Worker memory.
pub const SPARK_WORKER_MEMORY: &str = "SPARK_WORKER_MEMORY";
/// Worker cores.
pub const SPARK_WORKER_CORES: &str = "SPARK_WORKER_CORES";
/// Worker container count.
pub const SPARK_WORKER_INSTANCES: &str = "SPARK_WORKER_INSTANCES";
/// Executor memory.
pub const SPARK_EXECUTOR_MEMORY: &str = "SPARK_EXECUTOR_MEMORY";
/// Executor cores.
pub const SPARK_EXECUTOR_CORES: &str = "SPARK_EXECUTOR_CORES";
/// Notebook image Python version.
pub const PYTHON_VERSION: &str = "PYTHON_VERSION";
/// Space-separated pip requirements for the notebook image.
pub const PYTHON_PACKAGES: &str = "PYTHON_PACKAGES";
/// Jupyter host port.
pub const JUPYTER_PORT: &str = "JUPYTER_PORT";
/// Spark master UI host port.
pub const SPARK_MASTER_UI_PORT: &str = "SPARK_MASTER_UI_PORT";
/// Spark master RPC host port.
pub const SPARK_MASTER_PORT: &str = "SPARK_MASTER_PORT";
/// First Spark worker UI host port.
pub const SPARK_WORKER_UI_PORT: &str = "SPARK_WORKER_UI_PORT";
/// Notebooks host directory.
pub const NOTEBOOKS_PATH: &str = "NOTEBOOKS_PATH";
/// Data host directory.
pub const DATA_PATH: &str = "DATA_PATH";
/// Compose network name.
pub const NETWORK_NAME: &str = "NETWORK_NAME";

const HEADER: &str = "\
# Auto-generated by sparklab from config/config.yaml. Do not edit.
# Changes are overwritten by `sparklab generate`.
";

/// A titled group of settings.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EnvSection {
    /// Comment line rendered above the entries.
    title: &'static str,
    entries: Vec<(&'static str, String)>,
}

/// The complete set of environment settings derived from a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSettings {
    sections: Vec<EnvSection>,
}

impl EnvSettings {
    /// Derives the settings from a validated configuration.
    #[must_use]
    pub fn from_config(config: &ClusterConfig) -> Self {
        let spark = &config.spark;
        let sections = vec![
            EnvSection {
                title: "Spark Configuration",
                entries: vec![
                    (SPARK_VERSION, spark.version.clone()),
                    (SPARK_MASTER_MEMORY, spark.master.memory.to_string()),
                    (SPARK_MASTER_CORES, spark.master.cores.to_string()),
                    (SPARK_WORKER_MEMORY, spark.worker.memory.to_string()),
                    (SPARK_WORKER_CORES, spark.worker.cores.to_string()),
                    (SPARK_WORKER_INSTANCES, spark.worker_instances.to_string()),
                    (SPARK_EXECUTOR_MEMORY, spark.executor.memory.to_string()),
                    (SPARK_EXECUTOR_CORES, spark.executor.cores.to_string()),
                ],
            },
            EnvSection {
                title: "Python Configuration",
                entries: vec![
                    (PYTHON_VERSION, config.python.version.clone()),
                    (PYTHON_PACKAGES, config.python.requirements()),
                ],
            },
            EnvSection {
                title: "Container Ports",
                entries: vec![
                    (JUPYTER_PORT, config.ports.jupyter.to_string()),
                    (SPARK_MASTER_UI_PORT, config.ports.master_ui.to_string()),
                    (SPARK_MASTER_PORT, config.ports.master.to_string()),
                    (SPARK_WORKER_UI_PORT, config.ports.worker_ui.to_string()),
                ],
            },
            EnvSection {
                title: "Volume Paths",
                entries: vec![
                    (NOTEBOOKS_PATH, config.volumes.notebooks.clone()),
                    (DATA_PATH, config.volumes.data.clone()),
                ],
            },
            EnvSection {
                title: "Network",
                entries: vec![(NETWORK_NAME, config.network.clone())],
            },
        ];
        Self { sections }
    }

    /// Looks up the raw (unquoted) value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates all entries in render order.
    pub fn entries(&self) -> impl Iterator<Item = &(&'static str, String)> {
        self.sections.iter().flat_map(|s| s.entries.iter())
    }

    /// Renders the env file text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from(HEADER);
        for section in &self.sections {
            let _ = writeln!(out);
            let _ = writeln!(out, "# {}", section.title);
            for (key, value) in &section.entries {
                let _ = writeln!(out, "{key}={}", quote(value));
            }
        }
        out
    }
}

/// Quotes values the env-file reader would otherwise split, truncate or
/// interpolate. Single quotes are literal; double quotes are only used when
/// the value itself contains a single quote.
fn quote(value: &str) -> String {
    let needs_quotes = value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '\\' | '$'));
    if !needs_quotes {
        return value.to_string();
    }
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
