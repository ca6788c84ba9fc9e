//! Ore generation settings, the vote configuration, and its reloadable store.
#![forbid(unsafe_code)]

mod error;
pub mod parse;
pub mod settings;
mod store;
pub mod vote;
mod watch;

pub use error::ConfigError;
pub use parse::{Parsed, Skipped};
pub use settings::{DEFAULT_DENSITY, DEFAULT_MAX_HEIGHT, DEFAULT_MIN_HEIGHT, GenerationSettings};
pub use store::ConfigStore;
pub use vote::{ReplacementRule, VoteConfig, load_from_path};
pub use watch::{ConfigWatcher, watch_config};
