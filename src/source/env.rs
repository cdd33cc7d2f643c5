//! Environment variable loading
//!
//! Variables named `<PREFIX><KEY>` become top-level entries. Names containing
//! the separator describe a path: `APP_DB__HOST=x` becomes
//! `{"DB": {"HOST": "x"}}`. A mapping whose keys are exactly `0..n` is
//! turned into a list, so `APP_PORTS__0` and `APP_PORTS__1` become
//! `{"PORTS": [.., ..]}`. All values are strings.

use serde_json::Value;
use std::collections::BTreeMap;

use super::{RawMap, Source, SourceError};

pub const DEFAULT_PREFIX: &str = "ELECTIVE_";
pub const DEFAULT_SEPARATOR: &str = "__";

/// Source name used for environment variables.
pub const ENV: &str = "env";

/// Reads prefixed variables from the process environment, or from an
/// injected set of variables.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    separator: String,
    vars: Option<Vec<(String, String)>>,
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl EnvSource {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), separator: DEFAULT_SEPARATOR.to_string(), vars: None }
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Read from `vars` instead of the process environment.
    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.vars = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Render `map` as shell `export` lines that this source would read back.
    pub fn dump(&self, map: &RawMap) -> String {
        let mut lines = Vec::new();
        for (key, value) in map {
            self.dump_value(key.clone(), value, &mut lines);
        }
        lines.join("\n")
    }

    fn dump_value(&self, key: String, value: &Value, lines: &mut Vec<String>) {
        match value {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.dump_value(format!("{}{}{}", key, self.separator, index), item, lines);
                }
            }
            Value::Object(map) => {
                for (sub, item) in map {
                    self.dump_value(format!("{}{}{}", key, self.separator, sub), item, lines);
                }
            }
            Value::String(s) => lines.push(format_sh(&key, s, &self.prefix)),
            Value::Null => lines.push(format_sh(&key, "", &self.prefix)),
            other => lines.push(format_sh(&key, &other.to_string(), &self.prefix)),
        }
    }

    /// Matching variables sorted by name, so conflicts are reported the
    /// same way on every run.
    fn snapshot(&self) -> Vec<(String, String)> {
        let mut vars: Vec<(String, String)> = match &self.vars {
            Some(vars) => vars.clone(),
            None => std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        };
        vars.retain(|(k, _)| k.starts_with(&self.prefix));
        vars.sort();
        vars
    }
}

impl Source for EnvSource {
    fn name(&self) -> &str {
        ENV
    }

    fn load(&self) -> Result<RawMap, SourceError> {
        let mut root: BTreeMap<String, Slot> = BTreeMap::new();

        for (key, value) in self.snapshot() {
            let Some(name) = key.strip_prefix(&self.prefix) else { continue };
            if name.is_empty() {
                continue;
            }
            let path: Vec<&str> =
                if self.separator.is_empty() { vec![name] } else { name.split(self.separator.as_str()).collect() };
            insert(&mut root, &path, value, &self.separator)?;
        }

        Ok(root.into_iter().map(|(k, slot)| (k, slot.into_value())).collect())
    }
}

/// Format one variable as a Bourne shell `export`, quoting the value.
pub fn format_sh(key: &str, value: &str, prefix: &str) -> String {
    format!("export {}{}='{}'", prefix, key, value.replace('\'', "'\\''"))
}

enum Slot {
    Leaf(String),
    Branch(BTreeMap<String, Slot>),
}

impl Slot {
    fn into_value(self) -> Value {
        match self {
            Slot::Leaf(s) => Value::String(s),
            Slot::Branch(children) => match list_indices(&children) {
                Some(order) => {
                    let mut by_key = children;
                    Value::Array(order.iter().filter_map(|k| by_key.remove(k)).map(Slot::into_value).collect())
                }
                None => Value::Object(children.into_iter().map(|(k, v)| (k, v.into_value())).collect()),
            },
        }
    }
}

fn insert(root: &mut BTreeMap<String, Slot>, path: &[&str], value: String, separator: &str) -> Result<(), SourceError> {
    let Some((last, parents)) = path.split_last() else { return Ok(()) };

    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        current = match current.entry(segment.to_string()).or_insert_with(|| Slot::Branch(BTreeMap::new())) {
            Slot::Branch(children) => children,
            Slot::Leaf(_) => {
                return Err(SourceError::MultipleDefinition { key: path[..=depth].join(separator) });
            }
        };
    }

    if current.contains_key(*last) {
        return Err(SourceError::MultipleDefinition { key: path.join(separator) });
    }
    current.insert(last.to_string(), Slot::Leaf(value));
    Ok(())
}

/// Keys in index order when they are exactly `0..n`.
fn list_indices(children: &BTreeMap<String, Slot>) -> Option<Vec<String>> {
    if children.is_empty() {
        return None;
    }
    let mut indexed = Vec::with_capacity(children.len());
    for key in children.keys() {
        indexed.push((key.parse::<usize>().ok()?, key.clone()));
    }
    indexed.sort();
    if indexed.iter().enumerate().all(|(position, (index, _))| position == *index) {
        Some(indexed.into_iter().map(|(_, key)| key).collect())
    } else {
        None
    }
}
