//! End-to-end tests for configuration materialization.
//!
//! These tests write a `config/config.yaml` into a scratch project, run the
//! full load → validate → render → write pipeline, and inspect the files on
//! disk:
//! 1. Determinism (byte-identical reruns)
//! 2. Cross-artifact port consistency
//! 3. Validation failures write nothing
//! 4. Scaling hint and notebook port propagation
//! 5. Field-level independence when only packages change
//! 6. Volume paths that compose would otherwise reinterpret

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use sparklab_common::config::ProjectLayout;
use sparklab_common::constants::{
    JUPYTER_CONTAINER_PORT, JUPYTER_SERVICE, MASTER_CONTAINER_PORT, MASTER_SERVICE,
    MASTER_UI_CONTAINER_PORT, WORKER_SERVICE, WORKER_UI_CONTAINER_PORT,
};
use sparklab_common::error::SparkLabError;
use sparklab_compose::env_file;
use sparklab_compose::manifest::Manifest;
use sparklab_compose::materialize::materialize;

const FULL_CONFIG: &str = r#"
spark:
  version: "3.5.0"
  master:
    memory: 1g
    cores: 1
  worker:
    memory: 2g
    cores: 2
    instances: 1
  executor:
    memory: 1g
    cores: 1
python:
  version: "3.11"
  packages:
    - pandas>=2.0
    - numpy
containers:
  jupyter:
    port: 8888
  spark_master:
    ui_port: 8080
    port: 7077
  spark_worker:
    ui_port: 8081
volumes:
  notebooks_path: ./notebooks
  data_path: ./data
network:
  name: spark-network
"#;

fn project(config: &str) -> (tempfile::TempDir, ProjectLayout) {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = ProjectLayout::for_root(dir.path());
    write_config(&layout, config);
    (dir, layout)
}

fn write_config(layout: &ProjectLayout, config: &str) {
    std::fs::create_dir_all(layout.config_file.parent().unwrap()).unwrap();
    std::fs::write(&layout.config_file, config).unwrap();
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

fn env_value(env_text: &str, key: &str) -> Option<String> {
    env_text
        .lines()
        .find_map(|l| l.strip_prefix(&format!("{key}=")).map(ToString::to_string))
}

// ── Determinism ──────────────────────────────────────────────────────

#[test]
fn materializing_twice_is_byte_identical() {
    let (_dir, layout) = project(FULL_CONFIG);

    let _ = materialize(&layout).expect("first run");
    let env_first = read(&layout.env_file);
    let manifest_first = read(&layout.manifest_file);

    let _ = materialize(&layout).expect("second run");
    assert_eq!(read(&layout.env_file), env_first);
    assert_eq!(read(&layout.manifest_file), manifest_first);
}

#[test]
fn identical_documents_in_different_projects_match() {
    let (_a, first) = project(FULL_CONFIG);
    let (_b, second) = project(FULL_CONFIG);
    let _ = materialize(&first).unwrap();
    let _ = materialize(&second).unwrap();
    assert_eq!(read(&first.env_file), read(&second.env_file));
    assert_eq!(read(&first.manifest_file), read(&second.manifest_file));
}

// ── Cross-artifact consistency ───────────────────────────────────────

#[test]
fn env_ports_match_manifest_host_ports() {
    let config = FULL_CONFIG
        .replace("port: 8888", "port: 9001")
        .replace("ui_port: 8080", "ui_port: 9002")
        .replace("port: 7077", "port: 9003")
        .replace("ui_port: 8081", "ui_port: 9004");
    let (_dir, layout) = project(&config);
    let _ = materialize(&layout).unwrap();

    let env_text = read(&layout.env_file);
    let manifest = Manifest::parse(&read(&layout.manifest_file)).unwrap();

    let cases = [
        (env_file::JUPYTER_PORT, JUPYTER_SERVICE, JUPYTER_CONTAINER_PORT),
        (env_file::SPARK_MASTER_UI_PORT, MASTER_SERVICE, MASTER_UI_CONTAINER_PORT),
        (env_file::SPARK_MASTER_PORT, MASTER_SERVICE, MASTER_CONTAINER_PORT),
        (env_file::SPARK_WORKER_UI_PORT, WORKER_SERVICE, WORKER_UI_CONTAINER_PORT),
    ];
    for (key, service, container_port) in cases {
        let env_port = env_value(&env_text, key).unwrap_or_else(|| panic!("{key} missing"));
        let host_port = manifest
            .service(service)
            .and_then(|s| s.host_port_for(container_port))
            .unwrap_or_else(|| panic!("{service} has no binding for {container_port}"));
        assert_eq!(env_port, host_port, "{key} vs {service}");
    }
}

// ── Validation failures ──────────────────────────────────────────────

#[test]
fn missing_worker_memory_fails_and_writes_nothing() {
    let config = FULL_CONFIG.replace("    memory: 2g\n", "");
    let (_dir, layout) = project(&config);

    let err = materialize(&layout).unwrap_err();
    assert!(
        matches!(err, SparkLabError::MissingField { .. }),
        "got: {err:?}"
    );
    assert!(err.to_string().contains("worker memory"), "got: {err}");
    assert!(!layout.env_file.exists());
    assert!(!layout.manifest_file.exists());
}

#[test]
fn malformed_document_fails_and_keeps_previous_artifacts() {
    let (_dir, layout) = project(FULL_CONFIG);
    let _ = materialize(&layout).unwrap();
    let env_before = read(&layout.env_file);
    let manifest_before = read(&layout.manifest_file);

    write_config(&layout, "spark:\n  version: [3.5.0\n");
    let err = materialize(&layout).unwrap_err();
    assert!(matches!(err, SparkLabError::Parse { .. }), "got: {err:?}");

    assert_eq!(read(&layout.env_file), env_before);
    assert_eq!(read(&layout.manifest_file), manifest_before);
}

#[test]
fn unitless_worker_memory_fails_and_writes_nothing() {
    let config = FULL_CONFIG.replace("    memory: 2g\n", "    memory: 1024\n");
    let (_dir, layout) = project(&config);

    let err = materialize(&layout).unwrap_err();
    assert!(
        matches!(err, SparkLabError::InvalidField { path: "spark.worker.memory", .. }),
        "got: {err:?}"
    );
    assert!(!layout.env_file.exists());
    assert!(!layout.manifest_file.exists());
}

#[test]
fn missing_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::for_root(dir.path());
    let err = materialize(&layout).unwrap_err();
    assert!(matches!(err, SparkLabError::Io { .. }), "got: {err:?}");
    assert!(err.to_string().contains("config.yaml"));
}

// ── Propagation ──────────────────────────────────────────────────────

#[test]
fn worker_instances_become_scaling_hint() {
    let config = FULL_CONFIG.replace("instances: 1", "instances: 3");
    let (_dir, layout) = project(&config);
    let _ = materialize(&layout).unwrap();

    let manifest = Manifest::parse(&read(&layout.manifest_file)).unwrap();
    assert_eq!(manifest.service(WORKER_SERVICE).unwrap().replicas(), 3);
    assert_eq!(
        env_value(&read(&layout.env_file), env_file::SPARK_WORKER_INSTANCES).as_deref(),
        Some("3")
    );
}

#[test]
fn notebook_port_reaches_env_file() {
    let config = FULL_CONFIG.replace("port: 8888", "port: 9999");
    let (_dir, layout) = project(&config);
    let _ = materialize(&layout).unwrap();

    assert_eq!(
        env_value(&read(&layout.env_file), env_file::JUPYTER_PORT).as_deref(),
        Some("9999")
    );
}

// ── Field-level independence ─────────────────────────────────────────

#[test]
fn changing_packages_only_touches_package_lines() {
    let (_dir, layout) = project(FULL_CONFIG);
    let _ = materialize(&layout).unwrap();
    let env_before = read(&layout.env_file);
    let manifest_before = read(&layout.manifest_file);

    write_config(
        &layout,
        &FULL_CONFIG.replace("    - numpy\n", "    - numpy\n    - scikit-learn==1.4.2\n"),
    );
    let _ = materialize(&layout).unwrap();
    let env_after = read(&layout.env_file);
    let manifest_after = read(&layout.manifest_file);

    let changed = |before: &str, after: &str| -> Vec<(String, String)> {
        before
            .lines()
            .zip(after.lines())
            .filter(|(b, a)| b != a)
            .map(|(b, a)| (b.to_string(), a.to_string()))
            .collect()
    };

    assert_eq!(env_before.lines().count(), env_after.lines().count());
    let env_changes = changed(&env_before, &env_after);
    assert_eq!(env_changes.len(), 1, "{env_changes:?}");
    assert!(env_changes[0].1.starts_with("PYTHON_PACKAGES="));
    assert!(env_changes[0].1.contains("scikit-learn==1.4.2"));

    assert_eq!(manifest_before.lines().count(), manifest_after.lines().count());
    let manifest_changes = changed(&manifest_before, &manifest_after);
    assert_eq!(manifest_changes.len(), 1, "{manifest_changes:?}");
    assert!(manifest_changes[0].1.contains("PYTHON_PACKAGES"));
    assert!(manifest_changes[0].1.contains("scikit-learn==1.4.2"));
}

// ── Volume paths ─────────────────────────────────────────────────────

#[test]
fn dollar_in_data_path_survives_both_artifacts() {
    let config = FULL_CONFIG.replace("data_path: ./data", "data_path: ./my$data");
    let (_dir, layout) = project(&config);
    let _ = materialize(&layout).unwrap();

    let manifest_text = read(&layout.manifest_file);
    assert!(manifest_text.contains("- ../my$$data:/opt/data"), "{manifest_text}");
    assert!(!manifest_text.contains("../my$data"), "{manifest_text}");
    assert_eq!(
        env_value(&read(&layout.env_file), env_file::DATA_PATH).as_deref(),
        Some("'./my$data'")
    );
}

#[test]
fn home_relative_volume_fails_and_writes_nothing() {
    let config = FULL_CONFIG.replace("notebooks_path: ./notebooks", "notebooks_path: ~/notebooks");
    let (_dir, layout) = project(&config);

    let err = materialize(&layout).unwrap_err();
    assert!(
        matches!(err, SparkLabError::InvalidField { path: "volumes.notebooks_path", .. }),
        "got: {err:?}"
    );
    assert!(!layout.env_file.exists());
    assert!(!layout.manifest_file.exists());
}
