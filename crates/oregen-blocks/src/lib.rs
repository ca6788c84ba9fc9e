//! Block identifiers, registry, and tag tables.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod selector;
pub mod types;

pub use registry::{BlockRegistry, RegistryError, TagResolver};
pub use selector::BlockSelector;
pub use types::{Block, BlockId, BlockState, canonical_id};

/// Tag consulted when a resource has no explicit replacement rules.
pub const NATURAL_STONES: &str = "c:natural_stones";
