//! Parsing and validation of `aion.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`ProjectConfig`]. The `[coverage]` table becomes a [`CoverageConfig`], the
//! set of queries the coverage instrumentation pass consults.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::*;
