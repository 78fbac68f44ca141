//! # orgdal-entity
//!
//! Domain entity models stored behind the persistence handles.

pub mod organization;

pub use organization::{CreateOrganization, Organization, UpdateOrganization};
