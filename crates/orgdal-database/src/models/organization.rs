//! PostgreSQL-backed organization handle.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use orgdal_core::error::{AppError, ErrorKind};
use orgdal_core::result::AppResult;
use orgdal_core::traits::Model;
use orgdal_core::types::filter::{Filter, FilterValue};
use orgdal_core::types::pagination::{FindOptions, PageResponse};
use orgdal_entity::organization::{CreateOrganization, Organization, UpdateOrganization};

/// Handle over the `organizations` table.
#[derive(Debug, Clone)]
pub struct PgOrganizationModel {
    pool: PgPool,
}

impl PgOrganizationModel {
    /// Create a new organization handle.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append `WHERE a = $1 AND b IS NULL ...` for every predicate.
///
/// Field names must already have passed [`Organization::check_filter`];
/// values are always bound.
fn push_where(builder: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    for (i, (field, value)) in filter.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        builder.push(field);
        match value {
            FilterValue::Null => {
                builder.push(" IS NULL");
            }
            FilterValue::Boolean(v) => {
                builder.push(" = ").push_bind(*v);
            }
            FilterValue::Integer(v) => {
                builder.push(" = ").push_bind(*v);
            }
            FilterValue::Float(v) => {
                builder.push(" = ").push_bind(*v);
            }
            FilterValue::Uuid(v) => {
                builder.push(" = ").push_bind(*v);
            }
            FilterValue::String(v) => {
                builder.push(" = ").push_bind(v.clone());
            }
        }
    }
}

fn select_query(options: &FindOptions) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT * FROM organizations");
    push_where(&mut builder, &options.filter);
    builder
        .push(" ORDER BY created_at ASC, id ASC LIMIT ")
        .push_bind(to_i64(options.limit))
        .push(" OFFSET ")
        .push_bind(to_i64(options.offset));
    builder
}

fn count_query(filter: &Filter, distinct: bool) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(if distinct {
        "SELECT COUNT(DISTINCT id) FROM organizations"
    } else {
        "SELECT COUNT(*) FROM organizations"
    });
    push_where(&mut builder, filter);
    builder
}

fn update_query(patch: &UpdateOrganization, filter: &Filter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE organizations SET updated_at = NOW()");
    if let Some(name) = &patch.name {
        builder.push(", name = ").push_bind(name.clone());
    }
    if let Some(description) = &patch.description {
        builder.push(", description = ").push_bind(description.clone());
    }
    if let Some(parent) = patch.parent_organization_id {
        builder.push(", parent_organization_id = ").push_bind(parent);
    }
    push_where(&mut builder, filter);
    builder
}

fn delete_query(filter: &Filter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("DELETE FROM organizations");
    push_where(&mut builder, filter);
    builder
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl Model for PgOrganizationModel {
    type Record = Organization;
    type Id = Uuid;
    type Data = CreateOrganization;
    type Patch = UpdateOrganization;

    async fn find_and_count_all(
        &self,
        options: &FindOptions,
    ) -> AppResult<Option<PageResponse<Organization>>> {
        Organization::check_filter(&options.filter)?;
        debug!(
            filter = %options.filter,
            offset = options.offset,
            limit = options.limit,
            "Finding organizations"
        );

        let total: i64 = count_query(&options.filter, false)
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count organizations", e)
            })?;

        let rows = select_query(options)
            .build_query_as::<Organization>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list organizations", e)
            })?;

        Ok(Some(PageResponse::new(rows, total.max(0) as u64)))
    }

    async fn build_and_save(&self, data: CreateOrganization) -> AppResult<Option<Organization>> {
        let organization = data.build();
        sqlx::query_as::<_, Organization>(
            "INSERT INTO organizations \
             (id, name, description, parent_organization_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(organization.id)
        .bind(&organization.name)
        .bind(&organization.description)
        .bind(organization.parent_organization_id)
        .bind(organization.created_at)
        .bind(organization.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create organization", e))
    }

    async fn update(&self, patch: &UpdateOrganization, filter: &Filter) -> AppResult<Vec<u64>> {
        Organization::check_filter(filter)?;
        let result = update_query(patch, filter)
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update organizations", e)
            })?;
        Ok(vec![result.rows_affected()])
    }

    async fn destroy(&self, filter: &Filter) -> AppResult<u64> {
        Organization::check_filter(filter)?;
        let result = delete_query(filter)
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete organizations", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn count(&self, filter: &Filter, distinct: bool) -> AppResult<u64> {
        Organization::check_filter(filter)?;
        let total: i64 = count_query(filter, distinct)
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count organizations", e)
            })?;
        Ok(total.max(0) as u64)
    }
}
