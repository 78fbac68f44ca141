//! In-memory organization handle.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use orgdal_core::error::AppError;
use orgdal_core::result::AppResult;
use orgdal_core::traits::Model;
use orgdal_core::types::filter::Filter;
use orgdal_core::types::pagination::{FindOptions, PageResponse};
use orgdal_entity::organization::{CreateOrganization, Organization, UpdateOrganization};

/// Organization handle backed by a vector, in insertion order.
///
/// Enforces the same parent reference rules as the `organizations` table:
/// a parent must exist when it is set, and deleting an organization makes
/// its direct children top-level.
#[derive(Debug, Default)]
pub struct MemoryOrganizationModel {
    records: RwLock<Vec<Organization>>,
}

impl MemoryOrganizationModel {
    /// Create an empty handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle pre-populated with `records`.
    pub fn with_records(records: Vec<Organization>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of stored organizations.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

/// Fail like a foreign key violation when `parent` names no stored organization.
fn check_parent(records: &[Organization], parent: Option<Uuid>) -> AppResult<()> {
    match parent {
        Some(parent) if !records.iter().any(|o| o.id == parent) => Err(AppError::database(
            format!("Parent organization {parent} does not exist"),
        )),
        _ => Ok(()),
    }
}

#[async_trait]
impl Model for MemoryOrganizationModel {
    type Record = Organization;
    type Id = Uuid;
    type Data = CreateOrganization;
    type Patch = UpdateOrganization;

    async fn find_and_count_all(
        &self,
        options: &FindOptions,
    ) -> AppResult<Option<PageResponse<Organization>>> {
        Organization::check_filter(&options.filter)?;
        let records = self.records.read().await;

        let matching: Vec<&Organization> =
            records.iter().filter(|o| o.matches(&options.filter)).collect();
        let count = matching.len() as u64;
        let rows = matching
            .into_iter()
            .skip(usize::try_from(options.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(options.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(Some(PageResponse::new(rows, count)))
    }

    async fn build_and_save(&self, data: CreateOrganization) -> AppResult<Option<Organization>> {
        let mut records = self.records.write().await;
        check_parent(&records, data.parent_organization_id)?;

        let organization = data.build();
        debug!(id = %organization.id, "Saving organization in memory");
        records.push(organization.clone());
        Ok(Some(organization))
    }

    async fn update(&self, patch: &UpdateOrganization, filter: &Filter) -> AppResult<Vec<u64>> {
        Organization::check_filter(filter)?;
        let mut records = self.records.write().await;
        check_parent(&records, patch.parent_organization_id.flatten())?;

        let mut affected = 0u64;
        for organization in records.iter_mut().filter(|o| o.matches(filter)) {
            patch.apply(organization);
            affected += 1;
        }
        Ok(vec![affected])
    }

    async fn destroy(&self, filter: &Filter) -> AppResult<u64> {
        Organization::check_filter(filter)?;
        let mut records = self.records.write().await;

        let (removed, kept): (Vec<Organization>, Vec<Organization>) =
            records.drain(..).partition(|o| o.matches(filter));
        *records = kept;

        // ON DELETE SET NULL
        for organization in records.iter_mut() {
            if organization
                .parent_organization_id
                .is_some_and(|parent| removed.iter().any(|r| r.id == parent))
            {
                organization.parent_organization_id = None;
            }
        }
        Ok(removed.len() as u64)
    }

    async fn count(&self, filter: &Filter, _distinct: bool) -> AppResult<u64> {
        // Records are unique by id, so distinct and plain counts agree.
        Organization::check_filter(filter)?;
        let records = self.records.read().await;
        Ok(records.iter().filter(|o| o.matches(filter)).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgdal_core::error::ErrorKind;
    use orgdal_core::types::pagination::PageRequest;
    use orgdal_entity::organization::model::PARENT_ORGANIZATION_FIELD;

    fn create(name: &str, parent: Option<Uuid>) -> CreateOrganization {
        CreateOrganization {
            name: name.to_string(),
            description: None,
            parent_organization_id: parent,
        }
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let model = MemoryOrganizationModel::new();
        let saved = model
            .build_and_save(create("Acme", None))
            .await
            .unwrap()
            .unwrap();

        let page = model
            .find_and_count_all(&FindOptions::new(
                Filter::by_id(saved.id),
                &PageRequest::new(1, 1),
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.rows, vec![saved]);
    }

    #[tokio::test]
    async fn test_pagination_keeps_total_count() {
        let model = MemoryOrganizationModel::new();
        for i in 0..5 {
            model
                .build_and_save(create(&format!("org-{i}"), None))
                .await
                .unwrap();
        }

        let page = model
            .find_and_count_all(&FindOptions::new(Filter::new(), &PageRequest::new(2, 2)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(page.count, 5);
        let names: Vec<_> = page.rows.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["org-2", "org-3"]);

        let past_end = model
            .find_and_count_all(&FindOptions::new(Filter::new(), &PageRequest::new(9, 2)))
            .await
            .unwrap()
            .unwrap();
        assert!(past_end.rows.is_empty());
        assert_eq!(past_end.count, 5);
    }

    #[tokio::test]
    async fn test_update_reports_affected_rows() {
        let model = MemoryOrganizationModel::new();
        let saved = model
            .build_and_save(create("Acme", None))
            .await
            .unwrap()
            .unwrap();

        let patch = UpdateOrganization {
            name: Some("Acme Corp".to_string()),
            ..UpdateOrganization::new(saved.id)
        };
        let report = model.update(&patch, &Filter::by_id(saved.id)).await.unwrap();
        assert_eq!(report, vec![1]);

        let missing = model
            .update(&patch, &Filter::by_id(Uuid::new_v4()))
            .await
            .unwrap();
        assert_eq!(missing, vec![0]);
    }

    #[tokio::test]
    async fn test_destroy_and_count() {
        let model = MemoryOrganizationModel::new();
        let parent = model
            .build_and_save(create("Parent", None))
            .await
            .unwrap()
            .unwrap();
        model
            .build_and_save(create("Child A", Some(parent.id)))
            .await
            .unwrap();
        model
            .build_and_save(create("Child B", Some(parent.id)))
            .await
            .unwrap();

        let children = Filter::new().eq(PARENT_ORGANIZATION_FIELD, parent.id);
        assert_eq!(model.count(&children, false).await.unwrap(), 2);
        assert_eq!(model.count(&children, true).await.unwrap(), 2);

        assert_eq!(model.destroy(&children).await.unwrap(), 2);
        assert_eq!(model.destroy(&children).await.unwrap(), 0);
        assert_eq!(model.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_parent_is_rejected() {
        let model = MemoryOrganizationModel::new();
        let err = model
            .build_and_save(create("Orphan", Some(Uuid::new_v4())))
            .await
            .expect_err("unknown parent");
        assert_eq!(err.kind, ErrorKind::Database);
        assert_eq!(model.len().await, 0);

        let saved = model
            .build_and_save(create("Acme", None))
            .await
            .unwrap()
            .unwrap();
        let patch = UpdateOrganization {
            parent_organization_id: Some(Some(Uuid::new_v4())),
            ..UpdateOrganization::new(saved.id)
        };
        let err = model
            .update(&patch, &Filter::by_id(saved.id))
            .await
            .expect_err("unknown parent");
        assert_eq!(err.kind, ErrorKind::Database);

        let stored = model.records.read().await;
        assert_eq!(stored[0].parent_organization_id, None);
    }

    #[tokio::test]
    async fn test_destroy_detaches_children() {
        let root = create("Root", None).build();
        let child = create("Child", Some(root.id)).build();
        let grandchild = create("Grandchild", Some(child.id)).build();
        let model = MemoryOrganizationModel::with_records(vec![
            root,
            child.clone(),
            grandchild.clone(),
        ]);

        assert_eq!(model.destroy(&Filter::by_id(child.id)).await.unwrap(), 1);

        let detached = model
            .find_and_count_all(&FindOptions::new(
                Filter::by_id(grandchild.id),
                &PageRequest::new(1, 1),
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detached.rows[0].parent_organization_id, None);
        assert!(detached.rows[0].is_root());

        let orphans = Filter::new().eq(PARENT_ORGANIZATION_FIELD, child.id);
        assert_eq!(model.count(&orphans, false).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_field_is_rejected() {
        let model = MemoryOrganizationModel::new();
        let err = model
            .count(&Filter::new().eq("parentOrganizationId", 1i64), false)
            .await
            .expect_err("unknown field");
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
