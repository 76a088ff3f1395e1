//! # taskloop config
//!
//! Everything that turns operator input into validated task definitions:
//!
//! - [`ConfigLoader`]: TOML config file with `${VAR}` expansion
//! - [`parse_duration`]: Go-style duration strings (`2h5m10s`, `100ms`)
//! - [`TaskSpec`] sources: comma-separated flag lists and line-based task files

mod duration;
mod error;
mod loader;
mod schema;
mod sources;

pub use duration::{format_duration, parse_duration};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use sources::{load_task_file, parse_task_file, specs_from_lists, ParsedTaskFile, SkippedRow, TaskSpec};
