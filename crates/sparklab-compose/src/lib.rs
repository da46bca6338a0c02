//! # sparklab-compose
//!
//! The configuration materializer.
//!
//! Handles:
//! - **Parser**: reading `config.yaml` into a raw document and validating it
//!   into a [`model::ClusterConfig`] with every default applied.
//! - **Env file**: deriving the flat `KEY=value` settings artifact.
//! - **Manifest**: substituting the configuration into the three-service
//!   compose template.
//! - **Materialize**: rendering both artifacts and writing them together.
//! - **Volumes**: creating the bind-mounted host directories.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod env_file;
pub mod manifest;
pub mod materialize;
pub mod model;
pub mod parser;
pub mod volumes;

pub use materialize::{Artifacts, materialize, render, write_artifacts};
pub use model::ClusterConfig;
pub use parser::{load_config, parse_config};
