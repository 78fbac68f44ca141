//! Persistence handle trait.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::filter::{Filter, FilterValue};
use crate::types::pagination::{FindOptions, PageResponse};

/// A queryable, mutable collection of records of one entity type.
///
/// Implementations own the storage; the data-access operations only call
/// these methods and reshape what comes back. Any `Err` returned here is
/// reported to callers as an internal failure.
#[async_trait]
pub trait Model: Send + Sync {
    /// The stored entity.
    type Record: Send + Sync;
    /// Primary key type.
    type Id: Clone + Debug + Into<FilterValue> + Send + Sync;
    /// Input used to build a new record.
    type Data: Send;
    /// Partial update carrying the target id.
    type Patch: Identified<Id = Self::Id> + Send + Sync;

    /// Search with pagination and count all matches.
    ///
    /// `Ok(None)` means the handle produced no result object at all, which
    /// is distinct from a page with zero rows.
    async fn find_and_count_all(
        &self,
        options: &FindOptions,
    ) -> AppResult<Option<PageResponse<Self::Record>>>;

    /// Build a record from `data` and persist it, returning the saved record.
    async fn build_and_save(&self, data: Self::Data) -> AppResult<Option<Self::Record>>;

    /// Apply `patch` to every record matching `filter`.
    ///
    /// Returns the affected-rows report; by convention its first element is
    /// the number of updated rows.
    async fn update(&self, patch: &Self::Patch, filter: &Filter) -> AppResult<Vec<u64>>;

    /// Delete every record matching `filter`. Returns the match indicator:
    /// zero when nothing matched.
    async fn destroy(&self, filter: &Filter) -> AppResult<u64>;

    /// Count records matching `filter`, collapsing duplicates when `distinct`.
    async fn count(&self, filter: &Filter, distinct: bool) -> AppResult<u64>;
}

/// Something that names the record it refers to.
pub trait Identified {
    /// Primary key type.
    type Id;

    /// The record id.
    fn id(&self) -> Self::Id;
}

/// A record that may point at a parent record in the same collection.
pub trait Hierarchical {
    /// Primary key type.
    type Id;

    /// Field holding the parent reference.
    const PARENT_FIELD: &'static str;

    /// The parent id, `None` for a root record.
    fn parent_id(&self) -> Option<Self::Id>;
}
