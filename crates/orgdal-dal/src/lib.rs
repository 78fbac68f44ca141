//! # orgdal-dal
//!
//! Data-access operations over any [`Model`](orgdal_core::traits::Model)
//! handle: paginated listing, lookup by id, create, update, delete, count,
//! and parent/child traversal for hierarchical records.
//!
//! Every operation resolves to its value or fails with an
//! [`AppError`](orgdal_core::AppError) whose status code is `404` (not
//! found) or `500` (anything else).

pub mod common;

pub use common::{
    UpdateResult, create, delete_by_id, get_by_id, get_children, get_parent, list, total,
    update_by_id,
};
