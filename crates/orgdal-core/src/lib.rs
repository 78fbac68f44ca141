//! # orgdal-core
//!
//! Core crate for orgdal. Contains the unified error system, configuration
//! schemas, filter and pagination types, and the [`Model`](traits::Model)
//! persistence handle trait that the data-access operations are written
//! against.
//!
//! This crate has **no** internal dependencies on other orgdal crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
