//! System-wide constants and default paths.
//!
//! Artifact paths are relative to the project root.

/// Configuration document, relative to the project root.
pub const CONFIG_FILE: &str = "config/config.yaml";

/// Generated environment settings file, relative to the project root.
pub const ENV_FILE: &str = "config/.env";

/// Generated compose manifest, relative to the project root.
pub const MANIFEST_FILE: &str = "docker/docker-compose.yml";

/// Dockerfile for the notebook image, relative to the project root.
pub const DOCKERFILE: &str = "docker/Dockerfile";

/// Application name used in CLI output and generated headers.
pub const APP_NAME: &str = "sparklab";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "sparklab";

/// Compose service name of the Spark master.
pub const MASTER_SERVICE: &str = "spark-master";

/// Compose service name of the Spark worker.
pub const WORKER_SERVICE: &str = "spark-worker";

/// Compose service name of the Jupyter notebook server.
pub const JUPYTER_SERVICE: &str = "jupyter";

/// Port the Spark master web UI listens on inside its container.
pub const MASTER_UI_CONTAINER_PORT: u16 = 8080;

/// Port the Spark master RPC endpoint listens on inside its container.
pub const MASTER_CONTAINER_PORT: u16 = 7077;

/// Port the Spark worker web UI listens on inside its container.
pub const WORKER_UI_CONTAINER_PORT: u16 = 8081;

/// Port Jupyter listens on inside its container.
pub const JUPYTER_CONTAINER_PORT: u16 = 8888;

/// Default Spark image repository.
pub const DEFAULT_SPARK_IMAGE: &str = "bitnami/spark";

/// Repository the notebook image is tagged with after a build.
pub const JUPYTER_IMAGE: &str = "sparklab/jupyter-pyspark";

/// Default Spark master memory.
pub const DEFAULT_MASTER_MEMORY: &str = "1g";

/// Default Spark master core count.
pub const DEFAULT_MASTER_CORES: u32 = 1;

/// Default number of worker instances.
pub const DEFAULT_WORKER_INSTANCES: u32 = 1;

/// Default executor memory.
pub const DEFAULT_EXECUTOR_MEMORY: &str = "1g";

/// Default executor core count.
pub const DEFAULT_EXECUTOR_CORES: u32 = 1;

/// Default Python version for the notebook image.
pub const DEFAULT_PYTHON_VERSION: &str = "3.11";

/// Default host port for Jupyter.
pub const DEFAULT_JUPYTER_PORT: u16 = 8888;

/// Default host port for the Spark master UI.
pub const DEFAULT_MASTER_UI_PORT: u16 = 8080;

/// Default host port for the Spark master RPC endpoint.
pub const DEFAULT_MASTER_PORT: u16 = 7077;

/// Default first host port for the Spark worker UI.
pub const DEFAULT_WORKER_UI_PORT: u16 = 8081;

/// Default host directory for notebooks.
pub const DEFAULT_NOTEBOOKS_PATH: &str = "./notebooks";

/// Default host directory for data.
pub const DEFAULT_DATA_PATH: &str = "./data";

/// Default compose network name.
pub const DEFAULT_NETWORK_NAME: &str = "spark-network";
