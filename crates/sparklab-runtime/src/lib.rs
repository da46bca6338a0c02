//! Runtime delegation for sparklab.
//!
//! The launcher never manages containers itself: every lifecycle command is
//! expressed as a [`command::ComposeCommand`] and handed to a
//! [`backend::ComposeBackend`] together with the generated manifest and env
//! file. Runtime output and failures are surfaced unchanged.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod backend;
pub mod command;
pub mod engine;

pub use engine::{Engine, LogOptions, StartOptions};
