//! # orgdal-database
//!
//! PostgreSQL connection management, migrations, and the concrete
//! persistence handles ([`Model`](orgdal_core::traits::Model)
//! implementations) for orgdal entities.

pub mod connection;
pub mod models;

pub use connection::DatabasePool;
pub use models::{MemoryOrganizationModel, PgOrganizationModel};
