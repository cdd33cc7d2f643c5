//! Mapping source keys onto declared options

use crate::error::{ElectiveError, Result};
use crate::schema::Schema;
use crate::source::env::ENV;
use crate::source::RawMap;

/// Rename `raw`'s top-level keys to their option keys, drop keys the source
/// may not provide, and convert environment strings to declared types.
///
/// Two keys naming the same option are an error. A schema without options
/// leaves the mapping as it is.
pub fn canonicalize(schema: &Schema, source: &str, raw: RawMap) -> Result<RawMap> {
    if !schema.has_options() {
        return Ok(raw);
    }

    let mut out = RawMap::new();
    for (raw_key, value) in raw {
        let Some(entry) = schema.lookup(source, &raw_key) else {
            tracing::debug!("Dropping undeclared key `{}` from {}", raw_key, source);
            continue;
        };
        if !entry.admits(source) {
            tracing::debug!("Option `{}` may not be set by {}", entry.name, source);
            continue;
        }
        if out.contains_key(entry.key()) {
            return Err(ElectiveError::DuplicateOption { option: entry.name.clone(), origin: source.to_string() });
        }
        let value = if source == ENV { entry.coerce(value)? } else { value };
        out.insert(entry.key().to_string(), value);
    }
    Ok(out)
}
