//! Crate-wide error type

use std::path::PathBuf;
use thiserror::Error;

use crate::model::NodeKind;
use crate::source::SourceError;

pub type Result<T, E = ElectiveError> = std::result::Result<T, E>;

/// Errors raised while loading a schema, reading sources, or merging.
///
/// Only [`SourceError::NotFound`] and [`SourceError::Decode`] are ever
/// recovered, and only by the file adapter when asked to. Everything else
/// reaches the caller.
#[derive(Error, Debug)]
pub enum ElectiveError {
    #[error("configured value for `combine` ({0}) is not one of left, right, none")]
    InvalidPolicy(String),

    #[error("required field `{0}` is missing from the schema")]
    MissingRequiredField(String),

    #[error("option `{option}` has unknown type `{found}`")]
    InvalidOptionType { option: String, found: String },

    #[error("flag `{flag}` is used by both `{first}` and `{second}`")]
    ConflictingFlag { flag: String, first: String, second: String },

    #[error("option `{option}` is set more than once by {origin}")]
    DuplicateOption { option: String, origin: String },

    #[error("cannot merge a {right} into a {left} at `{path}`")]
    MergeTypeMismatch { path: String, left: NodeKind, right: NodeKind },

    #[error("cannot track {found} from source `{origin}`")]
    UnsupportedType { found: String, origin: String },

    #[error("invalid value `{value}` for option `{option}`: expected {expected}")]
    InvalidValue { option: String, value: String, expected: &'static str },

    #[error("failed to read schema {}", .path.display())]
    SchemaIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid schema {}: {message}", .path.display())]
    SchemaDecode { path: PathBuf, message: String },

    #[error(transparent)]
    Source(#[from] SourceError),
}
