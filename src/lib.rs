//! elective: merge configuration from declared defaults, TOML/JSON/YAML
//! files, environment variables and command-line flags, keeping the full
//! history of where every value came from.
//!
//! ```no_run
//! use elective::Elective;
//!
//! let elective = Elective::load("client.toml")?;
//! let config = elective.resolve(std::env::args().skip(1))?;
//! if let Some(width) = config.current("width") {
//!     println!("width = {}", width);
//! }
//! # Ok::<(), elective::ElectiveError>(())
//! ```

pub mod error;
pub mod merge;
pub mod model;
pub mod resolve;
pub mod schema;
pub mod source;
pub mod utils;

pub use error::{ElectiveError, Result};
pub use merge::{fold_layers, make_stateful, make_stateful_map, merge, Layer, MergePolicy};
pub use model::{Node, NodeKind, Provenance, Scalar, State};
pub use resolve::{Elective, SourceSet};
pub use schema::{load_schema, OptionType, Schema, SchemaEntry};
pub use source::{CliSource, DefaultsSource, EnvSource, FileFormat, FileSource, RawMap, Source, SourceError};
