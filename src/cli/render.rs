//! Output rendering for resolved configuration

use anyhow::{Context, Result};
use serde_json::Value;

use super::settings::{OutputFormat, Settings};
use elective::{Node, Provenance, RawMap, Schema};

pub fn render(node: &Node, schema: &Schema, settings: &Settings) -> Result<String> {
    match settings.format {
        OutputFormat::Json if settings.provenance => {
            serde_json::to_string_pretty(&Provenance(node)).context("Failed to serialize provenance")
        }
        OutputFormat::Json => serde_json::to_string_pretty(node).context("Failed to serialize configuration"),
        OutputFormat::Env => {
            if settings.provenance {
                tracing::warn!("--provenance has no effect on env output");
            }
            Ok(schema.env_source().dump(&env_keys(node, schema)))
        }
    }
}

/// Current values keyed by the names the environment source expects.
fn env_keys(node: &Node, schema: &Schema) -> RawMap {
    let Value::Object(values) = node.to_value() else { return RawMap::new() };
    values
        .into_iter()
        .map(|(key, value)| {
            let name = schema
                .options
                .values()
                .find(|entry| entry.key() == key)
                .map(|entry| entry.env_name())
                .unwrap_or_else(|| key.to_uppercase().replace('-', "_"));
            (name, value)
        })
        .collect()
}
