//! Configuration sources
//!
//! Every source produces a plain nested mapping of option name to value.
//! The orchestrator treats them uniformly through [`Source`]:
//! - [`DefaultsSource`]: values declared in the schema
//! - [`FileSource`]: TOML, JSON, or YAML files, optionally scoped to a section
//! - [`EnvSource`]: prefixed environment variables, with nested keys and lists
//! - [`CliSource`]: command-line flags registered from the schema

use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;

pub mod cli;
pub mod convert;
pub mod defaults;
pub mod env;
pub mod file;

pub use cli::CliSource;
pub use defaults::DefaultsSource;
pub use env::EnvSource;
pub use file::{FileFormat, FileSource};

/// A source's output: option name to raw value.
pub type RawMap = Map<String, Value>;

/// A named producer of configuration values.
pub trait Source {
    /// Name recorded as the provenance of every value this source yields.
    fn name(&self) -> &str;

    /// Load the source. An empty mapping means "nothing configured here".
    fn load(&self) -> Result<RawMap, SourceError>;
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("{} could not be decoded: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{key} is defined multiple times in the environment")]
    MultipleDefinition { key: String },

    /// Malformed command line, or a help request.
    #[error(transparent)]
    Arguments(#[from] clap::Error),

    /// A display option was given; the message should be shown and the
    /// program should stop.
    #[error("{0}")]
    Display(String),
}
