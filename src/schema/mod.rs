//! Option schema
//!
//! A schema is a TOML document with an `[elective]` table:
//!
//! ```toml
//! [elective]
//! name = "client"
//! description = "An example client."
//! combine = "left"
//! order = ["default", "toml", "env", "cli"]
//!
//! [elective.options.spell-check]
//! type = "boolean_group"
//! providers = ["cli", "env", "file"]
//! default = false
//! short_pos = "c"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

mod entry;

pub use entry::{OptionType, SchemaEntry};

use crate::error::{ElectiveError, Result};
use crate::merge::MergePolicy;
use crate::source::cli::CLI;
use crate::source::defaults::DEFAULTS;
use crate::source::env::{EnvSource, ENV};
use crate::source::{FileFormat, RawMap};

/// Source order used when the schema does not declare one.
pub const DEFAULT_ORDER: [&str; 6] = [DEFAULTS, "toml", "json", "yaml", ENV, CLI];

/// A loaded and validated schema.
#[derive(Debug, Clone)]
pub struct Schema {
    pub name: String,
    pub description: Option<String>,
    pub policy: MergePolicy,
    /// Source names in declared order, with aliases canonicalised.
    pub order: Vec<String>,
    pub options: BTreeMap<String, SchemaEntry>,
}

impl Schema {
    /// Parse a schema from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        parse(content, Path::new("<inline>"))
    }

    /// Prefix of environment variables read for this program, e.g.
    /// `ELECTIVE_CLIENT_`.
    pub fn env_prefix(&self) -> String {
        format!("ELECTIVE_{}_", self.name.to_uppercase().replace('-', "_"))
    }

    pub fn env_source(&self) -> EnvSource {
        EnvSource::new(self.env_prefix())
    }

    /// Declared defaults keyed by each option's resolved key. Options without
    /// a declared default and display options contribute nothing.
    pub fn defaults(&self) -> RawMap {
        self.options
            .values()
            .filter(|entry| entry.kind != OptionType::Display)
            .filter_map(|entry| Some((entry.key().to_string(), entry.default.clone()?)))
            .collect()
    }

    /// The option a top-level key from `source` refers to.
    pub fn lookup(&self, source: &str, raw_key: &str) -> Option<&SchemaEntry> {
        self.options.values().filter(|entry| entry.kind != OptionType::Display).find(|entry| {
            entry.name == raw_key
                || entry.dest.as_deref() == Some(raw_key)
                || (source == ENV && entry.env_name() == raw_key)
        })
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

/// Read and validate the schema at `path`.
pub fn load_schema(path: impl AsRef<Path>) -> Result<Schema> {
    let path = path.as_ref();
    let content =
        fs::read_to_string(path).map_err(|source| ElectiveError::SchemaIo { path: path.to_path_buf(), source })?;
    let schema = parse(&content, path)?;
    tracing::debug!(
        "Loaded schema {} for `{}`: {} options, policy {}",
        path.display(),
        schema.name,
        schema.options.len(),
        schema.policy
    );
    Ok(schema)
}

/// Canonical name of a source as written in `order`.
pub fn canonical_source(name: &str) -> String {
    match name {
        "defaults" => DEFAULTS.to_string(),
        other => FileFormat::from_name(other).map(|f| f.name().to_string()).unwrap_or_else(|| other.to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct SchemaDocument {
    elective: Option<RawSchema>,
}

#[derive(Debug, Deserialize)]
struct RawSchema {
    name: Option<String>,
    description: Option<String>,
    combine: Option<String>,
    order: Option<Vec<String>>,
    #[serde(default)]
    options: BTreeMap<String, RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "type")]
    kind: Option<String>,
    providers: Option<Vec<String>>,
    default: Option<toml::Value>,
    help: Option<String>,
    dest: Option<String>,
    short_pos: Option<String>,
    long_pos: Option<String>,
    short_neg: Option<String>,
    long_neg: Option<String>,
}

fn parse(content: &str, path: &Path) -> Result<Schema> {
    let document: SchemaDocument = toml::from_str(content)
        .map_err(|e| ElectiveError::SchemaDecode { path: PathBuf::from(path), message: e.to_string() })?;

    let raw = document.elective.ok_or_else(|| ElectiveError::MissingRequiredField("elective".into()))?;
    let name = raw.name.ok_or_else(|| ElectiveError::MissingRequiredField("elective.name".into()))?;
    let policy = MergePolicy::from_setting(raw.combine.as_deref())?;

    let order = match raw.order {
        Some(order) => order.iter().map(|s| canonical_source(s)).collect(),
        None => DEFAULT_ORDER.iter().map(|s| s.to_string()).collect(),
    };

    let mut options = BTreeMap::new();
    for (option, raw_entry) in raw.options {
        let entry = build_entry(&option, raw_entry)?;
        options.insert(option, entry);
    }
    check_flags(&options)?;

    Ok(Schema { name, description: raw.description, policy, order, options })
}

fn build_entry(name: &str, raw: RawEntry) -> Result<SchemaEntry> {
    let found = raw.kind.ok_or_else(|| ElectiveError::MissingRequiredField(format!("elective.options.{}.type", name)))?;
    let kind = found
        .parse::<OptionType>()
        .map_err(|_| ElectiveError::InvalidOptionType { option: name.to_string(), found: found.clone() })?;

    for short in [&raw.short_pos, &raw.short_neg].into_iter().flatten() {
        if short.chars().count() != 1 || short == "-" {
            return Err(ElectiveError::InvalidValue {
                option: name.to_string(),
                value: short.clone(),
                expected: "a single-character short flag",
            });
        }
    }

    for long in [&raw.long_pos, &raw.long_neg].into_iter().flatten() {
        if long.is_empty() || long.starts_with('-') {
            return Err(ElectiveError::InvalidValue {
                option: name.to_string(),
                value: long.clone(),
                expected: "a long flag name without leading dashes",
            });
        }
    }

    Ok(SchemaEntry {
        name: name.to_string(),
        kind,
        providers: raw.providers.map(|p| p.iter().map(|s| canonical_source(s)).collect()),
        default: raw.default.map(crate::source::convert::toml_to_json),
        help: raw.help,
        dest: raw.dest,
        short_pos: raw.short_pos,
        long_pos: raw.long_pos,
        short_neg: raw.short_neg,
        long_neg: raw.long_neg,
    })
}

/// Every id, short and long the command-line parser will register must be
/// unique, `-h`/`--help` included.
fn check_flags(options: &BTreeMap<String, SchemaEntry>) -> Result<()> {
    const HELP: &str = "help";
    let mut claimed: BTreeMap<String, String> = BTreeMap::new();
    for flag in [HELP.to_string(), "-h".to_string(), format!("--{}", HELP)] {
        claimed.insert(flag, HELP.to_string());
    }

    let mut claim = |flag: String, owner: &str| -> Result<()> {
        match claimed.get(&flag) {
            Some(first) => Err(ElectiveError::ConflictingFlag { flag, first: first.clone(), second: owner.to_string() }),
            None => {
                claimed.insert(flag, owner.to_string());
                Ok(())
            }
        }
    };

    for entry in options.values().filter(|e| e.admits(CLI)) {
        let long = entry.long_flag();
        if long.is_empty() {
            return Err(ElectiveError::InvalidValue {
                option: entry.name.clone(),
                value: long,
                expected: "a non-empty long flag",
            });
        }
        claim(entry.name.clone(), &entry.name)?;
        claim(format!("--{}", long), &entry.name)?;
        if let Some(short) = entry.short_flag() {
            claim(format!("-{}", short), &entry.name)?;
        }
        if let Some((long, short)) = entry.negative_flags() {
            let owner = entry.negated_id();
            claim(owner.clone(), &owner)?;
            claim(format!("--{}", long), &owner)?;
            if let Some(short) = short {
                claim(format!("-{}", short), &owner)?;
            }
        }
    }
    Ok(())
}
