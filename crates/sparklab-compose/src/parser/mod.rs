//! `config.yaml` loader.
//!
//! Reads the configuration document through `serde_yaml` into the raw AST,
//! then hands it to the validator which applies defaults and checks the
//! schema. Nothing here touches the filesystem except [`load_config`].

pub mod ast;
pub mod validator;

use std::path::Path;

use sparklab_common::error::{Result, SparkLabError};

use self::ast::ConfigDocument;
use crate::model::ClusterConfig;

/// Parses and validates a configuration document from its source text.
///
/// An empty document is treated as an empty mapping, so it fails on the
/// first required field rather than with a YAML error.
///
/// # Errors
///
/// Returns [`SparkLabError::Yaml`] for malformed YAML or mistyped values and
/// a validation error for missing or invalid fields.
pub fn parse_config(input: &str) -> Result<ClusterConfig> {
    let doc = parse_document(input)?;
    validator::validate(doc)
}

fn parse_document(input: &str) -> Result<ConfigDocument> {
    if input.trim().is_empty() {
        return Ok(ConfigDocument::default());
    }
    let doc: Option<ConfigDocument> = serde_yaml::from_str(input)?;
    Ok(doc.unwrap_or_default())
}

/// Reads, parses and validates the configuration document at `path`.
///
/// # Errors
///
/// Returns [`SparkLabError::Io`] if the file cannot be read,
/// [`SparkLabError::Parse`] naming the file for malformed YAML, and a
/// validation error for missing or invalid fields.
pub fn load_config(path: &Path) -> Result<ClusterConfig> {
    tracing::info!(path = %path.display(), "loading configuration");
    let content = std::fs::read_to_string(path).map_err(|e| SparkLabError::io(path, e))?;
    let doc = parse_document(&content).map_err(|e| match e {
        SparkLabError::Yaml(source) => SparkLabError::Parse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    validator::validate(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
spark:
  version: "3.5.0"
  master:
    memory: 1g
    cores: 1
  worker:
    memory: 2g
    cores: 2
    instances: 2
  executor:
    memory: 1g
    cores: 1
python:
  version: "3.11"
  packages:
    - pandas>=2.0
    - name: pyarrow
      version: "15.0.0"
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

    #[test]
    fn parse_full_sample() {
        let cfg = parse_config(SAMPLE).unwrap();
        assert_eq!(cfg.spark.version, "3.5.0");
        assert_eq!(cfg.spark.worker.memory.as_str(), "2g");
        assert_eq!(cfg.spark.worker_instances, 2);
        assert_eq!(cfg.python.requirements(), "pandas>=2.0 pyarrow==15.0.0");
        assert_eq!(cfg.ports.worker_ui, 8081);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let input = format!("{SAMPLE}\nmonitoring:\n  grafana: true\n");
        let with_extra = input.replace(
            "  version: \"3.5.0\"",
            "  version: \"3.5.0\"\n  flavour: vanilla",
        );
        assert_eq!(
            parse_config(&with_extra).unwrap(),
            parse_config(SAMPLE).unwrap()
        );
    }

    #[test]
    fn unquoted_versions_are_read_as_numbers() {
        let input = SAMPLE
            .replace("  version: \"3.5.0\"", "  version: 4.0")
            .replace("  version: \"3.11\"", "  version: 3.10");
        let cfg = parse_config(&input).unwrap();
        assert_eq!(cfg.spark.image_ref(), "bitnami/spark:4.0");
        // YAML reads 3.10 as the float 3.1; quoting is the only way to keep it.
        assert_eq!(cfg.python.version, "3.1");
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let err = parse_config("spark: [unclosed").unwrap_err();
        assert!(matches!(err, SparkLabError::Yaml(_)), "got: {err:?}");
    }

    #[test]
    fn mistyped_value_is_a_yaml_error() {
        let input = SAMPLE.replace("cores: 2", "cores: many");
        let err = parse_config(&input).unwrap_err();
        assert!(matches!(err, SparkLabError::Yaml(_)), "got: {err:?}");
    }

    #[test]
    fn empty_document_reports_first_missing_section() {
        let msg = parse_config("").unwrap_err().to_string();
        assert!(msg.contains("spark section"), "got: {msg}");
    }

    #[test]
    fn load_config_wraps_yaml_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "spark: {version: [").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, SparkLabError::Parse { .. }), "got: {err:?}");
        assert!(err.to_string().contains("config.yaml"));
    }

    #[test]
    fn load_config_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, SparkLabError::Io { .. }), "got: {err:?}");
    }
}
