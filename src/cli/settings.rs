//! Runner settings
//!
//! Precedence (lowest to highest):
//! 1. Built-in defaults
//! 2. A settings file given with `--settings`
//! 3. `ELECTIVE_RUNNER_*` environment variables
//! 4. Flags given on the command line

use anyhow::{Context, Result};
use clap::ValueEnum;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "ELECTIVE_RUNNER_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Resolved values as JSON
    #[default]
    Json,
    /// Shell `export` lines the environment source reads back
    Env,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub format: OutputFormat,
    /// Include each value's source history (JSON only)
    pub provenance: bool,
    /// Directory holding `.{name}.{toml,json,yaml}`
    pub dir: PathBuf,
    /// Fail on configuration files that do not decode
    pub strict: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { format: OutputFormat::Json, provenance: false, dir: PathBuf::from("."), strict: false }
    }
}

/// Values given explicitly on the command line.
#[derive(Debug, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

impl Settings {
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));
        if let Some(path) = file {
            if !path.exists() {
                anyhow::bail!("Settings file not found: {}", path.display());
            }
            figment = figment.merge(Toml::file(path));
        }
        let settings: Settings = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::globals(overrides))
            .extract()
            .context("Failed to extract runner settings")?;
        tracing::debug!("Runner settings: {:?}", settings);
        Ok(settings)
    }
}
