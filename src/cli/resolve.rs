//! Resolve command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::render::render;
use super::settings::{OutputFormat, Overrides, Settings};
use elective::{Elective, ElectiveError, SourceError};

#[derive(Args)]
pub struct ResolveArgs {
    /// Schema file declaring the program's options
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Output format
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Show every value's source history
    #[arg(long)]
    pub provenance: bool,

    /// Directory searched for the program's configuration files
    #[arg(short = 'd', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Fail on configuration files that cannot be decoded
    #[arg(long)]
    pub strict: bool,

    /// Runner settings file (TOML)
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Arguments for the configured program, after `--`
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

pub fn run(args: ResolveArgs) -> Result<()> {
    let overrides = Overrides {
        format: args.format,
        provenance: args.provenance.then_some(true),
        dir: args.dir,
        strict: args.strict.then_some(true),
    };
    let settings = Settings::load(args.settings.as_deref(), &overrides)?;

    let elective = Elective::load(&args.schema)
        .with_context(|| format!("Failed to load schema {}", args.schema.display()))?
        .config_dir(&settings.dir)
        .fail_on_decode(settings.strict);

    let resolved = match elective.resolve(args.args) {
        Ok(resolved) => resolved,
        Err(ElectiveError::Source(SourceError::Display(message))) => {
            println!("{}", message);
            std::process::exit(0);
        }
        Err(ElectiveError::Source(SourceError::Arguments(err))) => err.exit(),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to resolve {}", elective.schema().name));
        }
    };

    println!("{}", render(&resolved, elective.schema(), &settings)?);
    Ok(())
}
