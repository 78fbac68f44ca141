//! Persistence handle implementations.

pub mod memory;
pub mod organization;

pub use memory::MemoryOrganizationModel;
pub use organization::PgOrganizationModel;
