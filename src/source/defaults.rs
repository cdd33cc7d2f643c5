//! Declared defaults

use super::{RawMap, Source, SourceError};

/// Source name used for schema defaults.
pub const DEFAULTS: &str = "default";

/// Serves a fixed mapping, normally the schema's declared defaults.
#[derive(Debug, Clone, Default)]
pub struct DefaultsSource {
    values: RawMap,
}

impl DefaultsSource {
    pub fn new(values: RawMap) -> Self {
        Self { values }
    }
}

impl Source for DefaultsSource {
    fn name(&self) -> &str {
        DEFAULTS
    }

    fn load(&self) -> Result<RawMap, SourceError> {
        Ok(self.values.clone())
    }
}
