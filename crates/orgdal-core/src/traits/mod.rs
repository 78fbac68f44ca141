//! Core traits defined in `orgdal-core` and implemented by other crates.

pub mod model;

pub use model::{Hierarchical, Identified, Model};
