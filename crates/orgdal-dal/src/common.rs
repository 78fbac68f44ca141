//! Status-coded wrappers around persistence handle calls.
//!
//! Each function issues at most one or two sequential calls on the handle,
//! normalizes the shape of what comes back, and maps failures:
//!
//! - a missing result (no result object, zero rows for an id, an empty
//!   update report, a zero delete indicator) becomes `404`;
//! - any error raised by the handle, or a result shape that should be
//!   impossible, becomes `500`.
//!
//! Composite operations forward the failures of the operation they
//! delegate to unchanged.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use orgdal_core::error::{AppError, ErrorKind};
use orgdal_core::result::AppResult;
use orgdal_core::traits::{Hierarchical, Identified, Model};
use orgdal_core::types::filter::Filter;
use orgdal_core::types::pagination::{FindOptions, PageRequest, PageResponse};

/// Outcome of [`update_by_id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult<Id> {
    /// The id taken from the update payload.
    pub id: Id,
    /// First element of the handle's affected-rows report.
    pub rows_affected: u64,
}

fn handle_failure(operation: &str, err: AppError) -> AppError {
    warn!(operation, kind = %err.kind, error = %err.message, "Persistence handle failed");
    AppError::with_source(
        ErrorKind::Internal,
        format!("Persistence handle failed during {operation}"),
        err,
    )
}

/// Fetch one page of records matching `filter` together with the total
/// match count.
///
/// The handle is asked for `offset = (page - 1) * limit` and `limit` rows.
/// A page with zero rows is a success; only a handle that yields no result
/// at all is reported as not found.
pub async fn list<M: Model>(
    model: &M,
    filter: Filter,
    page: u64,
    limit: u64,
) -> AppResult<PageResponse<M::Record>> {
    let options = FindOptions::new(filter, &PageRequest::new(page, limit));
    debug!(
        filter = %options.filter,
        offset = options.offset,
        limit = options.limit,
        "Listing records"
    );

    match model.find_and_count_all(&options).await {
        Ok(Some(matches)) => Ok(matches),
        Ok(None) => Err(AppError::not_found(format!(
            "No result for filter {}",
            options.filter
        ))),
        Err(e) => Err(handle_failure("list", e)),
    }
}

/// Fetch the single record whose `id` equals `id`.
pub async fn get_by_id<M: Model>(model: &M, id: M::Id) -> AppResult<M::Record> {
    let data = list(model, Filter::by_id(id.clone()), 1, 1).await?;
    let found = data.rows.len();

    let mut rows = data.rows.into_iter();
    match (rows.next(), rows.next()) {
        (Some(record), None) => Ok(record),
        (None, _) => Err(AppError::not_found(format!("Record {id:?} not found"))),
        (Some(_), Some(_)) => {
            warn!(id = ?id, found, "Lookup by id returned more than one row");
            Err(AppError::internal(format!(
                "Lookup of record {id:?} returned {found} rows"
            )))
        }
    }
}

/// Build and persist a new record from `data`.
pub async fn create<M: Model>(model: &M, data: M::Data) -> AppResult<M::Record> {
    match model.build_and_save(data).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => {
            warn!("Persistence handle returned no record after save");
            Err(AppError::internal("Saved record is missing"))
        }
        Err(e) => Err(handle_failure("create", e)),
    }
}

/// Apply `data` to every record whose `id` equals `data.id()`.
///
/// An empty affected-rows report is reported as not found. A report of
/// `[0]` is a success with `rows_affected == 0`.
pub async fn update_by_id<M: Model>(model: &M, data: M::Patch) -> AppResult<UpdateResult<M::Id>> {
    let id = data.id();
    debug!(id = ?id, "Updating record");

    match model.update(&data, &Filter::by_id(id.clone())).await {
        Ok(report) => match report.first() {
            Some(&rows_affected) => Ok(UpdateResult { id, rows_affected }),
            None => Err(AppError::not_found(format!("Record {id:?} not found"))),
        },
        Err(e) => Err(handle_failure("update_by_id", e)),
    }
}

/// Delete every record whose `id` equals `id`, resolving with that id.
pub async fn delete_by_id<M: Model>(model: &M, id: M::Id) -> AppResult<M::Id> {
    debug!(id = ?id, "Deleting record");

    match model.destroy(&Filter::by_id(id.clone())).await {
        Ok(0) => Err(AppError::not_found(format!("Record {id:?} not found"))),
        Ok(_) => Ok(id),
        Err(e) => Err(handle_failure("delete_by_id", e)),
    }
}

/// Count records matching `filter`. Zero matches is a successful `0`.
pub async fn total<M: Model>(model: &M, filter: Filter, distinct: bool) -> AppResult<u64> {
    model
        .count(&filter, distinct)
        .await
        .map_err(|e| handle_failure("total", e))
}

/// One page of the records whose parent reference equals `parent_id`.
pub async fn get_children<M>(
    model: &M,
    parent_id: M::Id,
    page: u64,
    limit: u64,
) -> AppResult<PageResponse<M::Record>>
where
    M: Model,
    M::Record: Hierarchical,
{
    let filter = Filter::new().eq(<M::Record as Hierarchical>::PARENT_FIELD, parent_id);
    list(model, filter, page, limit).await
}

/// The record referenced by the parent field of record `id`.
///
/// A missing child and a missing parent both fail with `404`; callers
/// cannot tell them apart. A top-level record has no parent and also
/// fails with `404`.
pub async fn get_parent<M>(model: &M, id: M::Id) -> AppResult<M::Record>
where
    M: Model,
    M::Record: Hierarchical<Id = M::Id>,
{
    let child = get_by_id(model, id.clone()).await?;

    let Some(parent_id) = child.parent_id() else {
        return Err(AppError::not_found(format!(
            "Record {id:?} has no parent"
        )));
    };

    get_by_id(model, parent_id).await.inspect_err(|e| {
        debug!(id = ?id, status = e.status_code(), "Parent lookup failed");
    })
}
