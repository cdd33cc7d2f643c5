//! Option declarations

use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{ElectiveError, Result};
use crate::source::defaults::DEFAULTS;
use crate::source::FileFormat;

/// Declared type of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Boolean,
    BooleanGroup,
    Int,
    Float,
    Str,
    List,
    /// Prints its default as a message and stops the program.
    Display,
}

impl OptionType {
    pub fn name(self) -> &'static str {
        match self {
            OptionType::Boolean => "boolean",
            OptionType::BooleanGroup => "boolean_group",
            OptionType::Int => "int",
            OptionType::Float => "float",
            OptionType::Str => "str",
            OptionType::List => "list",
            OptionType::Display => "display",
        }
    }
}

impl FromStr for OptionType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s {
            "boolean" => Ok(OptionType::Boolean),
            "boolean_group" => Ok(OptionType::BooleanGroup),
            "int" => Ok(OptionType::Int),
            "float" => Ok(OptionType::Float),
            "str" => Ok(OptionType::Str),
            "list" => Ok(OptionType::List),
            "display" => Ok(OptionType::Display),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One declared option. Fields that were not declared are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    pub name: String,
    pub kind: OptionType,
    /// Sources allowed to set this option; `None` allows all.
    pub providers: Option<Vec<String>>,
    pub default: Option<Value>,
    pub help: Option<String>,
    /// Key the option resolves under, instead of its name.
    pub dest: Option<String>,
    pub short_pos: Option<String>,
    pub long_pos: Option<String>,
    pub short_neg: Option<String>,
    pub long_neg: Option<String>,
}

impl SchemaEntry {
    pub fn new(name: impl Into<String>, kind: OptionType) -> Self {
        Self {
            name: name.into(),
            kind,
            providers: None,
            default: None,
            help: None,
            dest: None,
            short_pos: None,
            long_pos: None,
            short_neg: None,
            long_neg: None,
        }
    }

    /// Key this option resolves under.
    pub fn key(&self) -> &str {
        self.dest.as_deref().unwrap_or(&self.name)
    }

    /// Name the environment uses for this option: `line-wrap` is `LINE_WRAP`.
    pub fn env_name(&self) -> String {
        self.name.to_uppercase().replace('-', "_")
    }

    /// Id of the negative flag of a boolean group.
    pub fn negated_id(&self) -> String {
        format!("{}:negated", self.name)
    }

    /// Long flag on the command line, without dashes.
    pub fn long_flag(&self) -> String {
        match self.kind {
            OptionType::Display => self.name.to_lowercase(),
            _ => self.long_pos.clone().unwrap_or_else(|| self.name.clone()),
        }
    }

    pub fn short_flag(&self) -> Option<char> {
        match self.kind {
            OptionType::Display => None,
            _ => first_char(&self.short_pos),
        }
    }

    /// Long and short flag of a boolean group's negative side. The long
    /// defaults to `no-<long>`, the short to the upper-cased positive short.
    pub fn negative_flags(&self) -> Option<(String, Option<char>)> {
        if self.kind != OptionType::BooleanGroup {
            return None;
        }
        let long = self.long_neg.clone().unwrap_or_else(|| format!("no-{}", self.long_flag()));
        let positive = first_char(&self.short_pos);
        let short = first_char(&self.short_neg)
            .or_else(|| positive.and_then(|c| c.to_uppercase().next()).filter(|upper| Some(*upper) != positive));
        Some((long, short))
    }

    /// Whether `source` may set this option. Declared defaults are always
    /// admitted; `file` admits every file format.
    pub fn admits(&self, source: &str) -> bool {
        let Some(providers) = &self.providers else { return true };
        if source == DEFAULTS {
            return true;
        }
        providers
            .iter()
            .any(|p| p == source || (p == "file" && FileFormat::from_name(source).is_some()))
    }

    /// Convert a string value (as the environment provides) to the declared
    /// type. Non-strings and untyped options pass through unchanged.
    pub fn coerce(&self, value: Value) -> Result<Value> {
        let Value::String(raw) = value else { return Ok(value) };
        let trimmed = raw.trim();
        match self.kind {
            OptionType::Boolean | OptionType::BooleanGroup => match parse_bool(trimmed) {
                Some(b) => Ok(Value::Bool(b)),
                None => Err(self.invalid(&raw, "a boolean (true/false, yes/no, 1/0, on/off)")),
            },
            OptionType::Int => {
                trimmed.parse::<i64>().map(Value::from).map_err(|_| self.invalid(&raw, "an integer"))
            }
            OptionType::Float => trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| self.invalid(&raw, "a finite number")),
            OptionType::Str | OptionType::List | OptionType::Display => Ok(Value::String(raw)),
        }
    }

    fn invalid(&self, value: &str, expected: &'static str) -> ElectiveError {
        ElectiveError::InvalidValue { option: self.name.clone(), value: value.to_string(), expected }
    }
}

fn first_char(flag: &Option<String>) -> Option<char> {
    flag.as_deref().and_then(|s| s.chars().next())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
