//! Integration tests for the runtime engine against a recording backend.
//!
//! Covers the sequences that combine materialization and delegation:
//! 1. `rebuild` regenerates artifacts before touching containers
//! 2. A configuration error during `rebuild` delegates nothing
//! 3. Runtime failures stop a sequence at the failing step

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use sparklab_common::config::ProjectLayout;
use sparklab_common::error::{Result, SparkLabError};
use sparklab_runtime::Engine;
use sparklab_runtime::backend::ComposeBackend;

const CONFIG: &str = "\
spark:
  version: \"3.5.0\"
  worker:
    memory: 2g
    cores: 2
    instances: 2
containers:
  jupyter:
    port: 8888
";

/// Records every call; fails the call whose subcommand matches `fail_on`.
#[derive(Default, Clone)]
struct Recorder {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    fail_on: Option<&'static str>,
}

impl ComposeBackend for Recorder {
    fn run(&self, args: &[String]) -> Result<()> {
        self.calls.lock().unwrap().push(args.to_vec());
        if self.fail_on.is_some_and(|sub| args.get(4).is_some_and(|a| a == sub)) {
            return Err(SparkLabError::Runtime {
                command: args.join(" "),
                code: Some(17),
            });
        }
        Ok(())
    }

    fn describe(&self) -> String {
        "recorder".into()
    }
}

impl Recorder {
    fn subcommands(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|argv| argv[4..].join(" "))
            .collect()
    }
}

fn project(config: &str) -> (tempfile::TempDir, ProjectLayout) {
    let dir = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::for_root(dir.path());
    std::fs::create_dir_all(layout.config_file.parent().unwrap()).unwrap();
    std::fs::write(&layout.config_file, config).unwrap();
    (dir, layout)
}

#[test]
fn rebuild_materializes_then_recreates() {
    let (_dir, layout) = project(CONFIG);
    let recorder = Recorder::default();
    let engine = Engine::with_backend(Box::new(recorder.clone()), layout.clone());

    engine.rebuild().unwrap();

    assert!(layout.env_file.is_file());
    assert!(layout.manifest_file.is_file());
    assert_eq!(
        recorder.subcommands(),
        ["down", "build --no-cache", "up -d"]
    );
}

#[test]
fn rebuild_with_invalid_config_delegates_nothing() {
    let (_dir, layout) = project("spark:\n  version: \"3.5.0\"\ncontainers: {}\n");
    let recorder = Recorder::default();
    let engine = Engine::with_backend(Box::new(recorder.clone()), layout.clone());

    let err = engine.rebuild().unwrap_err();
    assert!(matches!(err, SparkLabError::MissingField { .. }), "got: {err:?}");
    assert!(recorder.calls.lock().unwrap().is_empty());
    assert!(!layout.manifest_file.exists());
}

#[test]
fn runtime_failure_stops_the_sequence() {
    let (_dir, layout) = project(CONFIG);
    let recorder = Recorder {
        fail_on: Some("build"),
        ..Recorder::default()
    };
    let engine = Engine::with_backend(Box::new(recorder.clone()), layout);

    let err = engine.rebuild().unwrap_err();
    assert!(
        matches!(err, SparkLabError::Runtime { code: Some(17), .. }),
        "got: {err:?}"
    );
    assert_eq!(recorder.subcommands(), ["down", "build --no-cache"]);
}
