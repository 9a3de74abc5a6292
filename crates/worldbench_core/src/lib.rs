//! Ambient infrastructure shared by worldbench binaries.
//!
//! Currently this is the logging setup: [`TracingConfig`] describes how the
//! global `tracing` subscriber is built and installs it.

/// Tracing subscriber configuration.
pub mod tracing_config;

pub use tracing_config::{LOG_ENV, LOG_FORMAT_ENV, TracingConfig, TracingConfigError, TracingFormat};
