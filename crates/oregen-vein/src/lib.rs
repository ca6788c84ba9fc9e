//! Sphere clumps and the per-chunk ore vein generator.
#![forbid(unsafe_code)]

pub mod cache;
pub mod clump;
mod generator;
mod replace;

pub use cache::{CACHED_RADII, ClumpCache};
pub use clump::{ClumpDraw, Offset, SphereClump, gaussian_index};
pub use generator::{
    GenerateError, GenerateReport, MAX_BASE_RADIUS, ResourceStats, VeinGenerator, base_radius,
};
pub use replace::replace_block;
