//! Query types shared by persistence handles and the data-access operations.

pub mod filter;
pub mod pagination;

pub use filter::{Filter, FilterValue};
pub use pagination::{FindOptions, PageRequest, PageResponse};
