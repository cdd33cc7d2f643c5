//! Configuration file loading

use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::convert::{toml_to_json, yaml_to_json};
use super::{RawMap, Source, SourceError};

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Json,
    Yaml,
}

impl FileFormat {
    /// Order tried when the format of a file is unknown.
    pub const DETECTION_ORDER: [FileFormat; 3] = [FileFormat::Toml, FileFormat::Yaml, FileFormat::Json];

    /// Source name, also the file extension.
    pub fn name(self) -> &'static str {
        match self {
            FileFormat::Toml => "toml",
            FileFormat::Json => "json",
            FileFormat::Yaml => "yaml",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "toml" => Some(FileFormat::Toml),
            "json" => Some(FileFormat::Json),
            "yaml" | "yml" => Some(FileFormat::Yaml),
            _ => None,
        }
    }

    /// Decode `content` into a top-level mapping.
    pub fn parse(self, content: &str) -> Result<RawMap, String> {
        let value = match self {
            FileFormat::Toml => {
                let raw: toml::Value = toml::from_str(content).map_err(|e| format!("Invalid TOML syntax: {}", e))?;
                toml_to_json(raw)
            }
            FileFormat::Json => serde_json::from_str(content).map_err(|e| format!("Invalid JSON syntax: {}", e))?,
            FileFormat::Yaml => {
                let raw: serde_yaml::Value =
                    serde_yaml::from_str(content).map_err(|e| format!("Invalid YAML syntax: {}", e))?;
                yaml_to_json(raw).map_err(|e| format!("Invalid YAML config: {}", e))?
            }
        };

        match value {
            Value::Object(map) => Ok(map),
            // An empty YAML document
            Value::Null => Ok(RawMap::new()),
            other => Err(format!("expected a mapping at the top level, found {}", json_kind(&other))),
        }
    }
}

/// Loads one configuration file.
///
/// By default a missing file is an error and an undecodable file yields an
/// empty mapping; both are switchable per instance.
#[derive(Debug, Clone)]
pub struct FileSource {
    name: String,
    path: PathBuf,
    formats: Vec<FileFormat>,
    section: Vec<String>,
    fail_on_missing: bool,
    fail_on_decode: bool,
}

impl FileSource {
    /// A file of a known format, named after the format.
    pub fn new(path: impl Into<PathBuf>, format: FileFormat) -> Self {
        Self {
            name: format.name().to_string(),
            path: path.into(),
            formats: vec![format],
            section: Vec::new(),
            fail_on_missing: true,
            fail_on_decode: false,
        }
    }

    /// A file of unknown format: each of [`FileFormat::DETECTION_ORDER`] is
    /// tried and the first that decodes wins.
    pub fn detect(path: impl Into<PathBuf>) -> Self {
        Self { name: "file".to_string(), formats: FileFormat::DETECTION_ORDER.to_vec(), ..Self::new(path, FileFormat::Toml) }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Only return the mapping found at a dotted path such as `tool.app`.
    pub fn section(self, dotted: &str) -> Self {
        self.section_path(dotted.split('.').filter(|s| !s.is_empty()))
    }

    pub fn section_path<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.section = segments.into_iter().map(Into::into).collect();
        self
    }

    pub fn fail_on_missing(mut self, yes: bool) -> Self {
        self.fail_on_missing = yes;
        self
    }

    pub fn fail_on_decode(mut self, yes: bool) -> Self {
        self.fail_on_decode = yes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(&self, content: &str) -> Result<RawMap, String> {
        let mut errors = Vec::new();
        for format in &self.formats {
            match format.parse(content) {
                Ok(map) => return self.scope(map),
                Err(e) => errors.push(e),
            }
        }
        Err(errors.join("; "))
    }

    fn scope(&self, map: RawMap) -> Result<RawMap, String> {
        let mut current = map;
        for (depth, segment) in self.section.iter().enumerate() {
            current = match current.remove(segment) {
                None => return Ok(RawMap::new()),
                Some(Value::Object(next)) => next,
                Some(other) => {
                    return Err(format!(
                        "section `{}` is a {}, not a mapping",
                        self.section[..=depth].join("."),
                        json_kind(&other)
                    ))
                }
            };
        }
        Ok(current)
    }
}

impl Source for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<RawMap, SourceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if self.fail_on_missing {
                    return Err(SourceError::NotFound { path: self.path.clone() });
                }
                tracing::debug!("No {} config at {}", self.name, self.path.display());
                return Ok(RawMap::new());
            }
            Err(source) => return Err(SourceError::Io { path: self.path.clone(), source }),
        };

        match self.decode(&content) {
            Ok(map) => Ok(map),
            Err(message) => {
                if self.fail_on_decode {
                    return Err(SourceError::Decode { path: self.path.clone(), message });
                }
                tracing::warn!("Ignoring undecodable config {}: {}", self.path.display(), message);
                Ok(RawMap::new())
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
