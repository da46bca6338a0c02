//! Schema enforcement for the parsed configuration document.
//!
//! Turns the all-optional [`ConfigDocument`] into a concrete
//! [`ClusterConfig`]: required fields are checked, defaults applied, and
//! cross-field invariants (distinct host ports, sane sizes) verified.
//!
//! Required: `spark.version`, `spark.worker.memory`, `spark.worker.cores`,
//! and the `containers` section. Everything else has a default.

use std::collections::HashSet;

use sparklab_common::constants;
use sparklab_common::error::{Result, SparkLabError};
use sparklab_common::types::{MemorySize, PythonPackage};

use super::ast::{ConfigDocument, PackageEntry, ResourceSection, Scalar};
use crate::model::{ClusterConfig, PortConfig, PythonConfig, Resources, SparkConfig, VolumeConfig};

/// Validates a parsed document and resolves it into a [`ClusterConfig`].
///
/// # Errors
///
/// Returns [`SparkLabError::MissingField`] naming the first absent required
/// field, or [`SparkLabError::InvalidField`] for a present but unusable value.
pub fn validate(doc: ConfigDocument) -> Result<ClusterConfig> {
    tracing::debug!("validating configuration document");

    let spark_section = doc.spark.ok_or(SparkLabError::MissingField {
        path: "spark",
        what: "spark section",
    })?;
    let version = required_text(spark_section.version, "spark.version", "cluster version")?;
    let worker = spark_section.worker.ok_or(SparkLabError::MissingField {
        path: "spark.worker",
        what: "worker sizing",
    })?;
    let containers = doc.containers.ok_or(SparkLabError::MissingField {
        path: "containers",
        what: "container ports",
    })?;

    let worker_memory = memory(
        worker.memory.ok_or(SparkLabError::MissingField {
            path: "spark.worker.memory",
            what: "worker memory",
        })?,
        "spark.worker.memory",
        "worker memory",
    )?;
    let worker_cores = cores(
        worker.cores.ok_or(SparkLabError::MissingField {
            path: "spark.worker.cores",
            what: "worker cores",
        })?,
        "spark.worker.cores",
        "worker cores",
    )?;
    let worker_instances = worker.instances.unwrap_or(constants::DEFAULT_WORKER_INSTANCES);
    if worker_instances == 0 {
        return Err(SparkLabError::InvalidField {
            path: "spark.worker.instances",
            what: "worker instance count",
            message: "must be at least 1".into(),
        });
    }

    let master = resources(
        spark_section.master,
        ("spark.master.memory", "master memory"),
        ("spark.master.cores", "master cores"),
        (constants::DEFAULT_MASTER_MEMORY, constants::DEFAULT_MASTER_CORES),
    )?;
    let executor = resources(
        spark_section.executor,
        ("spark.executor.memory", "executor memory"),
        ("spark.executor.cores", "executor cores"),
        (constants::DEFAULT_EXECUTOR_MEMORY, constants::DEFAULT_EXECUTOR_CORES),
    )?;
    if executor.cores > worker_cores {
        tracing::warn!(
            executor_cores = executor.cores,
            worker_cores,
            "executor requests more cores than a worker offers; executors will not be scheduled"
        );
    }

    let image = spark_section
        .image
        .unwrap_or_else(|| constants::DEFAULT_SPARK_IMAGE.to_string());
    non_empty(&image, "spark.image", "Spark image")?;

    let python_section = doc.python.unwrap_or_default();
    let python = PythonConfig {
        version: python_section.version.map_or_else(
            || Ok(constants::DEFAULT_PYTHON_VERSION.to_string()),
            |v| required_text(Some(v), "python.version", "Python version"),
        )?,
        packages: packages(python_section.packages.unwrap_or_default())?,
    };

    let jupyter = containers.jupyter.unwrap_or_default();
    let master_ports = containers.spark_master.unwrap_or_default();
    let worker_ports = containers.spark_worker.unwrap_or_default();
    let ports = PortConfig {
        jupyter: port(
            jupyter.port,
            constants::DEFAULT_JUPYTER_PORT,
            "containers.jupyter.port",
            "notebook port",
        )?,
        master_ui: port(
            master_ports.ui_port,
            constants::DEFAULT_MASTER_UI_PORT,
            "containers.spark_master.ui_port",
            "coordinator UI port",
        )?,
        master: port(
            master_ports.port,
            constants::DEFAULT_MASTER_PORT,
            "containers.spark_master.port",
            "coordinator service port",
        )?,
        worker_ui: port(
            worker_ports.ui_port,
            constants::DEFAULT_WORKER_UI_PORT,
            "containers.spark_worker.ui_port",
            "worker UI port",
        )?,
    };
    check_port_conflicts(&ports, worker_instances)?;

    let volumes_section = doc.volumes.unwrap_or_default();
    let volumes = VolumeConfig {
        notebooks: volumes_section
            .notebooks_path
            .unwrap_or_else(|| constants::DEFAULT_NOTEBOOKS_PATH.to_string()),
        data: volumes_section
            .data_path
            .unwrap_or_else(|| constants::DEFAULT_DATA_PATH.to_string()),
    };
    host_dir(&volumes.notebooks, "volumes.notebooks_path", "notebooks path")?;
    host_dir(&volumes.data, "volumes.data_path", "data path")?;

    let network = doc
        .network
        .and_then(|n| n.name)
        .unwrap_or_else(|| constants::DEFAULT_NETWORK_NAME.to_string());
    check_network_name(&network)?;

    Ok(ClusterConfig {
        spark: SparkConfig {
            version,
            image,
            master,
            worker: Resources {
                memory: worker_memory,
                cores: worker_cores,
            },
            worker_instances,
            executor,
        },
        python,
        ports,
        volumes,
        network,
    })
}

fn required_text(value: Option<Scalar>, path: &'static str, what: &'static str) -> Result<String> {
    let text = value
        .map(Scalar::into_text)
        .ok_or(SparkLabError::MissingField { path, what })?;
    let text = text.trim().to_string();
    non_empty(&text, path, what)?;
    Ok(text)
}

fn non_empty(value: &str, path: &'static str, what: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SparkLabError::InvalidField {
            path,
            what,
            message: "must not be empty".into(),
        });
    }
    Ok(())
}

/// Host directories are absolute or relative to the project root. Compose
/// does not expand `~`, so a home-relative path would silently become a
/// literal `~` directory.
fn host_dir(value: &str, path: &'static str, what: &'static str) -> Result<()> {
    non_empty(value, path, what)?;
    if value.trim_start().starts_with('~') {
        return Err(SparkLabError::InvalidField {
            path,
            what,
            message: format!(
                "\"{value}\" uses `~`; use an absolute path or one relative to the project root"
            ),
        });
    }
    Ok(())
}

fn memory(value: Scalar, path: &'static str, what: &'static str) -> Result<MemorySize> {
    value
        .into_text()
        .parse()
        .map_err(|message| SparkLabError::InvalidField { path, what, message })
}

fn cores(n: u32, path: &'static str, what: &'static str) -> Result<u32> {
    if n == 0 {
        return Err(SparkLabError::InvalidField {
            path,
            what,
            message: "must be at least 1".into(),
        });
    }
    Ok(n)
}

fn resources(
    section: Option<ResourceSection>,
    (memory_path, memory_what): (&'static str, &'static str),
    (cores_path, cores_what): (&'static str, &'static str),
    (default_memory, default_cores): (&str, u32),
) -> Result<Resources> {
    let section = section.unwrap_or_default();
    let raw_memory = section
        .memory
        .unwrap_or_else(|| Scalar::Text(default_memory.to_string()));
    Ok(Resources {
        memory: memory(raw_memory, memory_path, memory_what)?,
        cores: cores(section.cores.unwrap_or(default_cores), cores_path, cores_what)?,
    })
}

fn port(value: Option<u16>, default: u16, path: &'static str, what: &'static str) -> Result<u16> {
    match value.unwrap_or(default) {
        0 => Err(SparkLabError::InvalidField {
            path,
            what,
            message: "port 0 is not bindable".into(),
        }),
        p => Ok(p),
    }
}

/// Every host port must be distinct. The worker UI claims one port per
/// instance starting at `worker_ui`.
fn check_port_conflicts(ports: &PortConfig, worker_instances: u32) -> Result<()> {
    let last_worker_port = u32::from(ports.worker_ui).saturating_add(worker_instances - 1);
    if last_worker_port > u32::from(u16::MAX) {
        return Err(SparkLabError::InvalidField {
            path: "containers.spark_worker.ui_port",
            what: "worker UI port",
            message: format!(
                "{worker_instances} instances starting at {} exceed port 65535",
                ports.worker_ui
            ),
        });
    }
    let worker_range = u32::from(ports.worker_ui)..=last_worker_port;

    let singles = [
        ("containers.jupyter.port", "notebook port", ports.jupyter),
        ("containers.spark_master.ui_port", "coordinator UI port", ports.master_ui),
        ("containers.spark_master.port", "coordinator service port", ports.master),
    ];
    for (i, &(path, what, p)) in singles.iter().enumerate() {
        if let Some((other, _, _)) = singles[..i].iter().find(|(_, _, q)| *q == p) {
            return Err(SparkLabError::InvalidField {
                path,
                what,
                message: format!("host port {p} is already assigned to `{other}`"),
            });
        }
        if worker_range.contains(&u32::from(p)) {
            return Err(SparkLabError::InvalidField {
                path,
                what,
                message: format!(
                    "host port {p} overlaps the worker UI range {}-{last_worker_port}",
                    ports.worker_ui
                ),
            });
        }
    }
    Ok(())
}

fn packages(entries: Vec<PackageEntry>) -> Result<Vec<PythonPackage>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        let pkg = match entry {
            PackageEntry::Requirement(spec) => PythonPackage::from_requirement(&spec),
            PackageEntry::Detailed { name, version } => PythonPackage {
                name: name.trim().to_string(),
                version: version
                    .map(Scalar::into_text)
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty()),
            },
        };
        if pkg.name.is_empty() {
            return Err(SparkLabError::InvalidField {
                path: "python.packages",
                what: "package list",
                message: "package name must not be empty".into(),
            });
        }
        if !seen.insert(normalize_package_name(&pkg.name)) {
            return Err(SparkLabError::InvalidField {
                path: "python.packages",
                what: "package list",
                message: format!("package \"{}\" is listed more than once", pkg.name),
            });
        }
        out.push(pkg);
    }
    Ok(out)
}

/// Package index names compare case-insensitively with `-`, `_` and `.`
/// treated as equal.
fn normalize_package_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '_' | '.' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

fn check_network_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if valid {
        Ok(())
    } else {
        Err(SparkLabError::InvalidField {
            path: "network.name",
            what: "network name",
            message: format!("\"{name}\" may only contain letters, digits, '_', '.' and '-'"),
        })
    }
}
