//! Resolving a schema against its sources
//!
//! [`Elective`] owns a schema and knows where its sources live. Resolution
//! walks the schema's `order`, loads each named source, maps its keys onto
//! the declared options, and folds the results with the schema's policy.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub mod keys;

pub use keys::canonicalize;

use crate::error::Result;
use crate::merge::{fold_layers, Layer};
use crate::model::Node;
use crate::schema::{load_schema, Schema};
use crate::source::{CliSource, DefaultsSource, FileFormat, FileSource, Source};

/// Sources available to a resolution, keyed by name.
#[derive(Default)]
pub struct SourceSet {
    sources: BTreeMap<String, Box<dyn Source>>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `source` under its own name, replacing any source of that name.
    pub fn with(mut self, source: impl Source + 'static) -> Self {
        self.insert(source);
        self
    }

    pub fn insert(&mut self, source: impl Source + 'static) {
        self.sources.insert(source.name().to_string(), Box::new(source));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Source> {
        self.sources.get(name).map(|s| s.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}

/// A schema plus the settings needed to find its sources.
#[derive(Debug, Clone)]
pub struct Elective {
    schema: Schema,
    config_dir: PathBuf,
    fail_on_decode: bool,
}

impl Elective {
    pub fn new(schema: Schema) -> Self {
        Self { schema, config_dir: PathBuf::from("."), fail_on_decode: false }
    }

    /// Load the schema at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(load_schema(path)?))
    }

    /// Directory searched for `.{name}.toml`, `.{name}.json` and `.{name}.yaml`.
    pub fn config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Fail instead of ignoring a configuration file that does not decode.
    pub fn fail_on_decode(mut self, yes: bool) -> Self {
        self.fail_on_decode = yes;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Path of the configuration file of `format`.
    pub fn file_path(&self, format: FileFormat) -> PathBuf {
        self.config_dir.join(format!(".{}.{}", self.schema.name, format.name()))
    }

    /// Defaults, one file per format, the process environment, and `args`
    /// as the command line.
    pub fn standard_sources<I, S>(&self, args: I) -> SourceSet
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = SourceSet::new().with(DefaultsSource::new(self.schema.defaults()));
        for format in FileFormat::DETECTION_ORDER {
            set.insert(
                FileSource::new(self.file_path(format), format)
                    .fail_on_missing(false)
                    .fail_on_decode(self.fail_on_decode),
            );
        }
        set.insert(self.schema.env_source());
        set.insert(CliSource::from_schema(&self.schema, args));
        set
    }

    /// Resolve with [`Elective::standard_sources`].
    pub fn resolve<I, S>(&self, args: I) -> Result<Node>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resolve_with(&self.standard_sources(args))
    }

    /// Resolve using `sources`. Names in the schema's order with no
    /// matching source are skipped.
    pub fn resolve_with(&self, sources: &SourceSet) -> Result<Node> {
        let mut layers = Vec::with_capacity(self.schema.order.len());
        for name in &self.schema.order {
            let Some(source) = sources.get(name) else {
                tracing::warn!("No source named `{}`; skipping", name);
                continue;
            };
            let raw = source.load()?;
            let values = canonicalize(&self.schema, name, raw)?;
            tracing::debug!("Source {} provided {} options", name, values.len());
            layers.push(Layer::new(name.clone(), values));
        }

        let resolved = fold_layers(self.schema.policy, &layers)?;
        tracing::info!("Resolved `{}` from {} sources with policy {}", self.schema.name, layers.len(), self.schema.policy);
        Ok(resolved)
    }
}
