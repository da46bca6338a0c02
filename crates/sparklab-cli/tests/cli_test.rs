//! End-to-end tests for the `sparklab` binary.
//!
//! Delegated commands are pointed at `true`/`false` through `--docker`, so
//! no container runtime is needed.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;
use std::process::{Command, Output};

const CONFIG: &str = "\
spark:
  version: \"3.5.0\"
  worker:
    memory: 2g
    cores: 2
    instances: 2
python:
  packages:
    - pandas
containers:
  jupyter:
    port: 9999
volumes:
  notebooks_path: ./notebooks
  data_path: ./data
";

fn project(config: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("config")).unwrap();
    std::fs::write(dir.path().join("config/config.yaml"), config).unwrap();
    dir
}

fn sparklab(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sparklab"))
        .arg("--project-dir")
        .arg(root)
        .args(args)
        .env_remove("SPARKLAB_CONFIG")
        .env_remove("SPARKLAB_DOCKER")
        .env_remove("RUST_LOG")
        .output()
        .expect("run sparklab")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn generate_writes_artifacts_and_volume_dirs() {
    let dir = project(CONFIG);
    let out = sparklab(dir.path(), &["generate"]);
    assert!(out.status.success(), "{}", stderr(&out));

    let env = std::fs::read_to_string(dir.path().join("config/.env")).unwrap();
    assert!(env.contains("JUPYTER_PORT=9999"));
    assert!(dir.path().join("docker/docker-compose.yml").is_file());
    assert!(dir.path().join("notebooks").is_dir());
    assert!(dir.path().join("data").is_dir());
}

#[test]
fn generate_rejects_invalid_config_without_writing() {
    let dir = project("spark:\n  version: \"3.5.0\"\n  worker:\n    cores: 2\ncontainers: {}\n");
    let out = sparklab(dir.path(), &["generate"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("worker memory"), "{}", stderr(&out));
    assert!(!dir.path().join("config/.env").exists());
    assert!(!dir.path().join("docker/docker-compose.yml").exists());
}

#[test]
fn config_json_goes_to_stdout() {
    let dir = project(CONFIG);
    let out = sparklab(dir.path(), &["config", "--format", "json"]);
    assert!(out.status.success(), "{}", stderr(&out));
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["ports"]["jupyter"], 9999);
    assert_eq!(value["spark"]["worker_instances"], 2);
}

#[test]
fn delegated_command_requires_generated_artifacts() {
    let dir = project(CONFIG);
    let out = sparklab(dir.path(), &["status", "--docker", "true"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("sparklab generate"), "{}", stderr(&out));
}

#[cfg(unix)]
#[test]
fn delegated_command_reports_runtime_exit_status() {
    let dir = project(CONFIG);
    assert!(sparklab(dir.path(), &["generate"]).status.success());

    let ok = sparklab(dir.path(), &["status", "--docker", "true"]);
    assert!(ok.status.success(), "{}", stderr(&ok));

    let failed = sparklab(dir.path(), &["stop", "--docker", "false"]);
    assert!(!failed.status.success());
    let message = stderr(&failed);
    assert!(message.contains("exited with status 1"), "{message}");
    assert!(message.contains("down"), "{message}");
}

#[cfg(unix)]
#[test]
fn clean_removes_artifacts_but_keeps_data() {
    let dir = project(CONFIG);
    assert!(sparklab(dir.path(), &["generate"]).status.success());
    std::fs::write(dir.path().join("data/input.csv"), "a,b\n").unwrap();

    let out = sparklab(dir.path(), &["clean", "--docker", "true"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(!dir.path().join("config/.env").exists());
    assert!(!dir.path().join("docker/docker-compose.yml").exists());
    assert!(dir.path().join("data/input.csv").is_file());
    assert!(dir.path().join("config/config.yaml").is_file());
}
