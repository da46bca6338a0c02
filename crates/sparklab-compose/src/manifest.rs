//! Orchestration manifest (`docker/docker-compose.yml`).
//!
//! The manifest is a fixed three-service template (`spark-master`,
//! `spark-worker`, `jupyter`) with configuration values substituted in.
//! Values are written literally rather than as `${VAR}` references, so the
//! manifest alone describes what will run. Maps are `BTreeMap`s and struct
//! fields serialize in declaration order, which keeps output deterministic.
//!
//! Compose interpolates `$` in every string of the file, so each value is
//! written with `$` doubled and reaches the container unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sparklab_common::constants::{
    self, JUPYTER_CONTAINER_PORT, JUPYTER_SERVICE, MASTER_CONTAINER_PORT, MASTER_SERVICE,
    MASTER_UI_CONTAINER_PORT, WORKER_SERVICE, WORKER_UI_CONTAINER_PORT,
};
use sparklab_common::error::Result;

use crate::model::{ClusterConfig, Resources};

const HEADER: &str = "\
# Auto-generated by sparklab from config/config.yaml. Do not edit.
# Changes are overwritten by `sparklab generate`.
";

/// Container path notebooks are mounted at in the Spark containers.
const SPARK_NOTEBOOKS_MOUNT: &str = "/opt/notebooks";
/// Container path data is mounted at in the Spark containers.
const SPARK_DATA_MOUNT: &str = "/opt/data";
/// Home directory of the notebook user.
const JUPYTER_HOME: &str = "/home/jovyan";

/// Container memory granted above a Spark daemon's configured size. The
/// configured size covers what the daemon hands out (executor memory on a
/// worker); the JVM heap and off-heap overhead come on top.
pub const DAEMON_MEMORY_HEADROOM: u64 = 1 << 30;

/// Settings that disable Spark's RPC/SSL security for local development.
const SPARK_INSECURE_ENV: [&str; 5] = [
    "SPARK_RPC_AUTHENTICATION_ENABLED=no",
    "SPARK_RPC_ENCRYPTION_ENABLED=no",
    "SPARK_LOCAL_STORAGE_ENCRYPTION_ENABLED=no",
    "SPARK_SSL_ENABLED=no",
    "SPARK_USER=spark",
];

/// Root of a compose file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Services keyed by name.
    pub services: BTreeMap<String, Service>,
    /// Networks keyed by name.
    pub networks: BTreeMap<String, Network>,
}

/// One compose service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Image reference (pulled, or tagged after `build`).
    pub image: String,
    /// Local build instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<Build>,
    /// Fixed container name. Omitted for scaled services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,
    /// `KEY=value` environment entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<String>,
    /// `host:container` port bindings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    /// `host:container` bind mounts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    /// Services that must start first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Networks the service joins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<String>,
    /// Replica count and resource limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy: Option<Deploy>,
}

/// Build section of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    /// Build context, relative to the manifest directory.
    pub context: String,
    /// Dockerfile, relative to the context.
    pub dockerfile: String,
    /// Build arguments.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub args: BTreeMap<String, String>,
}

/// Deploy section of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deploy {
    /// Scaling hint: number of containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,
    /// Resource constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<DeployResources>,
}

/// `deploy.resources`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployResources {
    /// Hard limits.
    pub limits: ResourceLimits,
}

/// `deploy.resources.limits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// CPU count, as a decimal string.
    pub cpus: String,
    /// Memory limit.
    pub memory: String,
}

/// A compose network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    /// Network driver.
    pub driver: String,
}

impl Manifest {
    /// Substitutes a validated configuration into the service template.
    #[must_use]
    pub fn from_config(config: &ClusterConfig) -> Self {
        let services = [
            (MASTER_SERVICE, master_service(config)),
            (WORKER_SERVICE, worker_service(config)),
            (JUPYTER_SERVICE, jupyter_service(config)),
        ]
        .into_iter()
        .map(|(name, service)| (name.to_string(), service.escape_interpolation()))
        .collect();

        let mut networks = BTreeMap::new();
        let _ = networks.insert(
            config.network.clone(),
            Network {
                driver: "bridge".into(),
            },
        );

        Self { services, networks }
    }

    /// Returns the service with the given name.
    #[must_use]
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.get(name)
    }

    /// Renders the manifest as YAML with the generated-file header.
    ///
    /// # Errors
    ///
    /// Returns an error if YAML serialization fails.
    pub fn render(&self) -> Result<String> {
        let body = serde_yaml::to_string(self)?;
        Ok(format!("{HEADER}{body}"))
    }

    /// Parses a rendered manifest back into its typed form.
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is not a manifest.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}

impl Service {
    /// Host side of the binding for `container_port`, e.g. `"9999"` or
    /// `"8081-8083"`.
    #[must_use]
    pub fn host_port_for(&self, container_port: u16) -> Option<&str> {
        let suffix = format!(":{container_port}");
        self.ports
            .iter()
            .find_map(|binding| binding.strip_suffix(suffix.as_str()))
    }

    /// Replica count, defaulting to one.
    #[must_use]
    pub fn replicas(&self) -> u32 {
        self.deploy.as_ref().and_then(|d| d.replicas).unwrap_or(1)
    }

    fn escape_interpolation(mut self) -> Self {
        let escape_all = |values: &mut [String]| {
            for value in values.iter_mut() {
                *value = compose_literal(value);
            }
        };
        self.image = compose_literal(&self.image);
        self.container_name = self.container_name.as_deref().map(compose_literal);
        escape_all(&mut self.environment);
        escape_all(&mut self.ports);
        escape_all(&mut self.volumes);
        escape_all(&mut self.depends_on);
        escape_all(&mut self.networks);
        if let Some(build) = self.build.as_mut() {
            build.context = compose_literal(&build.context);
            build.dockerfile = compose_literal(&build.dockerfile);
            for value in build.args.values_mut() {
                *value = compose_literal(value);
            }
        }
        if let Some(limits) = self.deploy.as_mut().and_then(|d| d.resources.as_mut()) {
            limits.limits.memory = compose_literal(&limits.limits.memory);
        }
        self
    }
}

/// Doubles `$` so compose reads the value literally.
fn compose_literal(value: &str) -> String {
    value.replace('$', "$$")
}

fn master_url() -> String {
    format!("spark://{MASTER_SERVICE}:{MASTER_CONTAINER_PORT}")
}

fn limits(resources: &Resources) -> DeployResources {
    const MIB: u64 = 1 << 20;
    let memory = resources
        .memory
        .bytes()
        .and_then(|bytes| bytes.checked_add(DAEMON_MEMORY_HEADROOM))
        .map_or_else(
            || resources.memory.to_string(),
            |bytes| format!("{}m", bytes.div_ceil(MIB)),
        );
    DeployResources {
        limits: ResourceLimits {
            cpus: resources.cores.to_string(),
            memory,
        },
    }
}

/// Host paths are relative to the project root, but the container runtime
/// resolves them against the manifest directory one level down. The
/// validator rejects `~` paths, so anything not absolute is relative.
fn host_path(path: &str) -> String {
    if path.starts_with('/') {
        return path.to_string();
    }
    let trimmed = path.trim_start_matches("./");
    if trimmed.is_empty() || trimmed == "." {
        "..".to_string()
    } else {
        format!("../{trimmed}")
    }
}

fn spark_volumes(config: &ClusterConfig) -> Vec<String> {
    let notebooks = host_path(&config.volumes.notebooks);
    let data = host_path(&config.volumes.data);
    vec![
        format!("{notebooks}:{SPARK_NOTEBOOKS_MOUNT}"),
        format!("{data}:{SPARK_DATA_MOUNT}"),
        format!("{data}:{JUPYTER_HOME}/data"),
    ]
}

fn master_service(config: &ClusterConfig) -> Service {
    let mut environment = vec!["SPARK_MODE=master".to_string()];
    environment.extend(SPARK_INSECURE_ENV.iter().map(ToString::to_string));
    Service {
        image: config.spark.image_ref(),
        container_name: Some(MASTER_SERVICE.into()),
        environment,
        ports: vec![
            format!("{}:{MASTER_UI_CONTAINER_PORT}", config.ports.master_ui),
            format!("{}:{MASTER_CONTAINER_PORT}", config.ports.master),
        ],
        volumes: spark_volumes(config),
        networks: vec![config.network.clone()],
        deploy: Some(Deploy {
            replicas: None,
            resources: Some(limits(&config.spark.master)),
        }),
        ..Service::default()
    }
}

fn worker_service(config: &ClusterConfig) -> Service {
    let worker = &config.spark.worker;
    let instances = config.spark.worker_instances;
    let first = config.ports.worker_ui;
    // One host port per replica; the validator guarantees the range fits.
    let host_ports = if instances > 1 {
        let last = u32::from(first) + instances - 1;
        format!("{first}-{last}")
    } else {
        first.to_string()
    };

    let mut environment = vec![
        "SPARK_MODE=worker".to_string(),
        format!("SPARK_MASTER_URL={}", master_url()),
        format!("SPARK_WORKER_MEMORY={}", worker.memory),
        format!("SPARK_WORKER_CORES={}", worker.cores),
    ];
    environment.extend(SPARK_INSECURE_ENV.iter().map(ToString::to_string));

    Service {
        image: config.spark.image_ref(),
        environment,
        ports: vec![format!("{host_ports}:{WORKER_UI_CONTAINER_PORT}")],
        volumes: spark_volumes(config),
        depends_on: vec![MASTER_SERVICE.into()],
        networks: vec![config.network.clone()],
        deploy: Some(Deploy {
            replicas: Some(instances),
            resources: Some(limits(worker)),
        }),
        ..Service::default()
    }
}

fn jupyter_service(config: &ClusterConfig) -> Service {
    let executor = &config.spark.executor;
    let notebooks = host_path(&config.volumes.notebooks);
    let data = host_path(&config.volumes.data);

    let mut args = BTreeMap::new();
    let _ = args.insert("PYTHON_VERSION".to_string(), config.python.version.clone());
    let _ = args.insert("PYTHON_PACKAGES".to_string(), config.python.requirements());
    let _ = args.insert("SPARK_VERSION".to_string(), config.spark.version.clone());

    Service {
        image: format!("{}:{}", constants::JUPYTER_IMAGE, config.spark.version),
        build: Some(Build {
            context: "..".into(),
            dockerfile: constants::DOCKERFILE.into(),
            args,
        }),
        container_name: Some("jupyter-pyspark".into()),
        environment: vec![
            "JUPYTER_ENABLE_LAB=yes".into(),
            format!("SPARK_MASTER_URL={}", master_url()),
            format!(
                "PYSPARK_SUBMIT_ARGS=--master {} --executor-memory {} --executor-cores {} pyspark-shell",
                master_url(),
                executor.memory,
                executor.cores
            ),
        ],
        ports: vec![format!("{}:{JUPYTER_CONTAINER_PORT}", config.ports.jupyter)],
        volumes: vec![
            format!("{notebooks}:{JUPYTER_HOME}/notebooks"),
            format!("{data}:{JUPYTER_HOME}/data"),
            format!("{data}:{SPARK_DATA_MOUNT}"),
        ],
        depends_on: vec![MASTER_SERVICE.into(), WORKER_SERVICE.into()],
        networks: vec![config.network.clone()],
        deploy: None,
    }
}
