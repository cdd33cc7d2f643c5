//! Info command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use elective::{load_schema, OptionType};

#[derive(Args)]
pub struct InfoArgs {
    /// Schema file to describe
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let schema =
        load_schema(&args.schema).with_context(|| format!("Failed to load schema {}", args.schema.display()))?;

    println!("Program: {}", schema.name);
    if let Some(description) = &schema.description {
        println!("Description: {}", description);
    }
    println!("Combine: {}", schema.policy);
    println!("Order: {}", schema.order.join(", "));
    println!("Environment prefix: {}", schema.env_prefix());

    if schema.options.is_empty() {
        return Ok(());
    }
    println!("Options:");
    for entry in schema.options.values() {
        let mut line = format!("  {} ({})", entry.name, entry.kind);
        if entry.key() != entry.name {
            line.push_str(&format!(" -> {}", entry.key()));
        }
        if let Some(default) = entry.default.as_ref().filter(|_| entry.kind != OptionType::Display) {
            line.push_str(&format!(" default={}", default));
        }
        if let Some(providers) = &entry.providers {
            line.push_str(&format!(" [{}]", providers.join(", ")));
        }
        println!("{}", line);
    }
    Ok(())
}
