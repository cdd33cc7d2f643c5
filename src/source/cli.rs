//! Command-line flags registered from a schema

use clap::builder::ValueParser;
use clap::parser::ValueSource;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde_json::{Number, Value};

use super::{RawMap, Source, SourceError};
use crate::schema::{OptionType, Schema, SchemaEntry};
use crate::utils::render_message;

/// Source name used for command-line arguments.
pub const CLI: &str = "cli";

/// Column at which display messages are wrapped.
pub const MESSAGE_WIDTH: usize = 72;

/// Parses a fixed argument list against flags derived from the schema.
///
/// Only flags actually given produce keys, so an option left off the
/// command line falls through to lower-precedence sources.
#[derive(Debug, Clone)]
pub struct CliSource {
    command: Command,
    options: Vec<SchemaEntry>,
    args: Vec<String>,
}

impl CliSource {
    /// Register every option whose providers admit the command line.
    /// `args` excludes the program name.
    pub fn from_schema<I, S>(schema: &Schema, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<SchemaEntry> = schema.options.values().filter(|e| e.admits(CLI)).cloned().collect();

        let mut command = Command::new(schema.name.clone());
        if let Some(about) = &schema.description {
            command = command.about(about.clone());
        }
        for entry in &options {
            for arg in register(entry) {
                command = command.arg(arg);
            }
        }

        Self { command, options, args: args.into_iter().map(Into::into).collect() }
    }

    /// The underlying parser, e.g. for rendering help.
    pub fn command(&self) -> &Command {
        &self.command
    }

    fn collect(&self, matches: &ArgMatches) -> Result<RawMap, SourceError> {
        let mut out = RawMap::new();
        for entry in &self.options {
            let id = entry.name.as_str();
            match entry.kind {
                OptionType::Display => {
                    if given(matches, id) {
                        let message = match &entry.default {
                            Some(Value::String(s)) => render_message(s, MESSAGE_WIDTH),
                            Some(Value::Null) | None => String::new(),
                            Some(other) => other.to_string(),
                        };
                        return Err(SourceError::Display(message));
                    }
                }
                OptionType::Boolean => {
                    if given(matches, id) {
                        out.insert(entry.key().to_string(), Value::Bool(true));
                    }
                }
                OptionType::BooleanGroup => {
                    if given(matches, id) {
                        out.insert(entry.key().to_string(), Value::Bool(true));
                    } else if given(matches, &entry.negated_id()) {
                        out.insert(entry.key().to_string(), Value::Bool(false));
                    }
                }
                OptionType::Int => {
                    if let Some(n) = matches.get_one::<i64>(id).filter(|_| given(matches, id)) {
                        out.insert(entry.key().to_string(), Value::from(*n));
                    }
                }
                OptionType::Float => {
                    if let Some(number) =
                        matches.get_one::<f64>(id).filter(|_| given(matches, id)).and_then(|f| Number::from_f64(*f))
                    {
                        out.insert(entry.key().to_string(), Value::Number(number));
                    }
                }
                OptionType::Str => {
                    if let Some(s) = matches.get_one::<String>(id).filter(|_| given(matches, id)) {
                        out.insert(entry.key().to_string(), Value::String(s.clone()));
                    }
                }
                OptionType::List => {
                    if let Some(items) = matches.get_many::<String>(id).filter(|_| given(matches, id)) {
                        out.insert(entry.key().to_string(), Value::Array(items.cloned().map(Value::String).collect()));
                    }
                }
            }
        }
        Ok(out)
    }
}

impl Source for CliSource {
    fn name(&self) -> &str {
        CLI
    }

    fn load(&self) -> Result<RawMap, SourceError> {
        let argv = std::iter::once(self.command.get_name().to_string()).chain(self.args.iter().cloned());
        let matches = self.command.clone().try_get_matches_from(argv)?;
        let parsed = self.collect(&matches)?;
        tracing::debug!("Parsed {} options from {} arguments", parsed.len(), self.args.len());
        Ok(parsed)
    }
}

fn given(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// Parse a float, rejecting `nan` and infinities as the environment does.
fn finite_f64(value: &str) -> Result<f64, String> {
    match value.trim().parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f),
        Ok(_) => Err("expected a finite number".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn register(entry: &SchemaEntry) -> Vec<Arg> {
    let mut arg = Arg::new(entry.name.clone()).long(entry.long_flag());
    if let Some(short) = entry.short_flag() {
        arg = arg.short(short);
    }
    if let Some(help) = &entry.help {
        arg = arg.help(help.clone());
    }

    match entry.kind {
        OptionType::Boolean | OptionType::Display => vec![arg.action(ArgAction::SetTrue)],
        OptionType::BooleanGroup => {
            let mut negative =
                Arg::new(entry.negated_id()).action(ArgAction::SetTrue).conflicts_with(entry.name.clone());
            if let Some((long, short)) = entry.negative_flags() {
                negative = negative.long(long);
                if let Some(short) = short {
                    negative = negative.short(short);
                }
            }
            if let Some(help) = &entry.help {
                negative = negative.help(format!("Negate: {}", help));
            }
            vec![arg.action(ArgAction::SetTrue), negative]
        }
        OptionType::Int => vec![arg.action(ArgAction::Set).value_parser(value_parser!(i64))],
        OptionType::Float => vec![arg.action(ArgAction::Set).value_parser(finite_f64)],
        OptionType::Str => vec![arg.action(ArgAction::Set).value_parser(ValueParser::string())],
        OptionType::List => vec![arg.action(ArgAction::Append).value_parser(ValueParser::string())],
    }
}
