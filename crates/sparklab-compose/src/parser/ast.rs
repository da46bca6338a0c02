//! Raw shape of `config.yaml` as written by the user.
//!
//! Every field is optional here; the validator decides which absences are
//! errors and which take a default. Unknown keys are ignored.

use serde::Deserialize;

/// Root node of a parsed configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigDocument {
    /// Spark cluster sizing.
    pub spark: Option<SparkSection>,
    /// Notebook image Python settings.
    pub python: Option<PythonSection>,
    /// Host port assignments.
    pub containers: Option<ContainersSection>,
    /// Host volume paths.
    pub volumes: Option<VolumesSection>,
    /// Compose network settings.
    pub network: Option<NetworkSection>,
}

/// The `spark:` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparkSection {
    /// Spark release, used as the image tag.
    pub version: Option<Scalar>,
    /// Spark image repository.
    pub image: Option<String>,
    /// Master sizing.
    pub master: Option<ResourceSection>,
    /// Worker sizing.
    pub worker: Option<WorkerSection>,
    /// Executor sizing.
    pub executor: Option<ResourceSection>,
}

/// Memory and cores for a Spark role.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceSection {
    /// Memory size such as `1g`.
    pub memory: Option<Scalar>,
    /// Core count.
    pub cores: Option<u32>,
}

/// The `spark.worker:` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkerSection {
    /// Memory per worker.
    pub memory: Option<Scalar>,
    /// Cores per worker.
    pub cores: Option<u32>,
    /// Number of worker containers.
    pub instances: Option<u32>,
}

/// The `python:` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PythonSection {
    /// Python version for the notebook image.
    pub version: Option<Scalar>,
    /// Packages installed into the notebook image.
    pub packages: Option<Vec<PackageEntry>>,
}

/// One entry of `python.packages`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PackageEntry {
    /// Requirement string: `pandas>=2.0`.
    Requirement(String),
    /// Mapping form: `{ name: pandas, version: ">=2.0" }`.
    Detailed {
        /// Package name.
        name: String,
        /// Optional version constraint.
        #[serde(default)]
        version: Option<Scalar>,
    },
}

/// The `containers:` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainersSection {
    /// Jupyter ports.
    pub jupyter: Option<JupyterPorts>,
    /// Spark master ports.
    pub spark_master: Option<MasterPorts>,
    /// Spark worker ports.
    pub spark_worker: Option<WorkerPorts>,
}

/// `containers.jupyter`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JupyterPorts {
    /// Host port for the notebook server.
    pub port: Option<u16>,
}

/// `containers.spark_master`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MasterPorts {
    /// Host port for the master web UI.
    pub ui_port: Option<u16>,
    /// Host port for the master RPC endpoint.
    pub port: Option<u16>,
}

/// `containers.spark_worker`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkerPorts {
    /// First host port for the worker web UI.
    pub ui_port: Option<u16>,
}

/// The `volumes:` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VolumesSection {
    /// Host directory mounted as the notebooks folder.
    pub notebooks_path: Option<String>,
    /// Host directory mounted as the data folder.
    pub data_path: Option<String>,
}

/// The `network:` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkSection {
    /// Compose network name.
    pub name: Option<String>,
}

/// A YAML scalar read as text.
///
/// `version: 3.5` and `version: "3.5"` are both accepted; unquoted numbers
/// are rendered back with their YAML value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// A string value.
    Text(String),
    /// An integer value.
    Integer(i64),
    /// A floating point value.
    Float(f64),
}

impl Scalar {
    /// Returns the scalar as text. Floats keep their fractional part, so an
    /// unquoted `4.0` stays `4.0`.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Integer(n) => n.to_string(),
            Self::Float(f) => format!("{f:?}"),
        }
    }
}
