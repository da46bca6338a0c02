//! Validated cluster configuration.
//!
//! Every value is concrete: defaults have been applied and invariants
//! checked, so rendering never has to fail.

use serde::Serialize;
use sparklab_common::types::{MemorySize, PythonPackage};

/// The fully resolved configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterConfig {
    /// Spark cluster settings.
    pub spark: SparkConfig,
    /// Notebook image Python settings.
    pub python: PythonConfig,
    /// Host port assignments.
    pub ports: PortConfig,
    /// Host volume paths, as written (relative to the project root or absolute).
    pub volumes: VolumeConfig,
    /// Compose network name.
    pub network: String,
}

/// Spark sizing and image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SparkConfig {
    /// Spark release, used as the image tag.
    pub version: String,
    /// Image repository for master and worker.
    pub image: String,
    /// Master resources.
    pub master: Resources,
    /// Worker resources.
    pub worker: Resources,
    /// Number of worker containers.
    pub worker_instances: u32,
    /// Per-executor resources requested by notebook sessions.
    pub executor: Resources,
}

impl SparkConfig {
    /// Full image reference for master and worker containers.
    #[must_use]
    pub fn image_ref(&self) -> String {
        format!("{}:{}", self.image, self.version)
    }
}

/// Memory and core count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resources {
    /// Memory size.
    pub memory: MemorySize,
    /// Core count.
    pub cores: u32,
}

/// Python settings for the notebook image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PythonConfig {
    /// Python version.
    pub version: String,
    /// Requirements installed at image build time, in document order.
    pub packages: Vec<PythonPackage>,
}

impl PythonConfig {
    /// Space-separated pip requirement list.
    #[must_use]
    pub fn requirements(&self) -> String {
        self.packages
            .iter()
            .map(PythonPackage::requirement)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Host ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortConfig {
    /// Jupyter notebook server.
    pub jupyter: u16,
    /// Spark master web UI.
    pub master_ui: u16,
    /// Spark master RPC endpoint.
    pub master: u16,
    /// First Spark worker web UI port; one port per instance.
    pub worker_ui: u16,
}

/// Host volume paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeConfig {
    /// Notebooks directory.
    pub notebooks: String,
    /// Data directory.
    pub data: String,
}
