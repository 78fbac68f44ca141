//! Organization entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use orgdal_core::error::AppError;
use orgdal_core::result::AppResult;
use orgdal_core::traits::{Hierarchical, Identified};
use orgdal_core::types::filter::{Filter, FilterValue, ID_FIELD};

/// Column holding the parent organization reference.
pub const PARENT_ORGANIZATION_FIELD: &str = "parent_organization_id";

/// An organization, optionally nested under a parent organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Organization {
    /// Unique organization identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Parent organization (null for top-level organizations).
    pub parent_organization_id: Option<Uuid>,
    /// When the organization was created.
    pub created_at: DateTime<Utc>,
    /// When the organization was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// Fields that may appear in a [`Filter`].
    pub const FILTERABLE_FIELDS: &'static [&'static str] =
        &[ID_FIELD, "name", "description", PARENT_ORGANIZATION_FIELD];

    /// Check if this is a top-level organization (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_organization_id.is_none()
    }

    /// Current value of a filterable field.
    pub fn field_value(&self, field: &str) -> Option<FilterValue> {
        match field {
            ID_FIELD => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "description" => Some(self.description.clone().into()),
            PARENT_ORGANIZATION_FIELD => Some(self.parent_organization_id.into()),
            _ => None,
        }
    }

    /// Whether every predicate of `filter` holds for this organization.
    pub fn matches(&self, filter: &Filter) -> bool {
        filter
            .iter()
            .all(|(field, expected)| self.field_value(field).as_ref() == Some(expected))
    }

    /// Reject filters naming fields an organization does not have.
    pub fn check_filter(filter: &Filter) -> AppResult<()> {
        match filter
            .iter()
            .find(|(field, _)| !Self::FILTERABLE_FIELDS.contains(field))
        {
            Some((field, _)) => Err(AppError::validation(format!(
                "Unknown organization filter field '{field}'"
            ))),
            None => Ok(()),
        }
    }
}

impl Identified for Organization {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Hierarchical for Organization {
    type Id = Uuid;

    const PARENT_FIELD: &'static str = PARENT_ORGANIZATION_FIELD;

    fn parent_id(&self) -> Option<Uuid> {
        self.parent_organization_id
    }
}

/// Data required to create a new organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Parent organization (None for top-level).
    #[serde(default)]
    pub parent_organization_id: Option<Uuid>,
}

impl CreateOrganization {
    /// Build an unsaved organization with a fresh id and timestamps.
    pub fn build(self) -> Organization {
        let now = Utc::now();
        Organization {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            parent_organization_id: self.parent_organization_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for an organization. `None` leaves a field unchanged;
/// `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrganization {
    /// Target organization.
    pub id: Uuid,
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    /// New parent organization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_organization_id: Option<Option<Uuid>>,
}

impl UpdateOrganization {
    /// An update targeting `id` that changes nothing yet.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Apply the changed fields to `organization` and bump `updated_at`.
    pub fn apply(&self, organization: &mut Organization) {
        if let Some(name) = &self.name {
            organization.name = name.clone();
        }
        if let Some(description) = &self.description {
            organization.description = description.clone();
        }
        if let Some(parent) = self.parent_organization_id {
            organization.parent_organization_id = parent;
        }
        organization.updated_at = Utc::now();
    }
}

impl Identified for UpdateOrganization {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(parent: Option<Uuid>) -> Organization {
        CreateOrganization {
            name: "Acme".to_string(),
            description: None,
            parent_organization_id: parent,
        }
        .build()
    }

    #[test]
    fn test_matches_equality() {
        let parent = Uuid::new_v4();
        let org = sample(Some(parent));

        assert!(org.matches(&Filter::new()));
        assert!(org.matches(&Filter::by_id(org.id)));
        assert!(org.matches(&Filter::new().eq(PARENT_ORGANIZATION_FIELD, parent).eq("name", "Acme")));
        assert!(!org.matches(&Filter::new().eq("name", "Other")));
        assert!(!org.matches(&Filter::by_id(Uuid::new_v4())));
    }

    #[test]
    fn test_null_filter_matches_root() {
        let root = sample(None);
        assert!(root.is_root());
        assert!(root.matches(&Filter::new().eq(PARENT_ORGANIZATION_FIELD, FilterValue::Null)));
        assert!(root.matches(&Filter::new().eq("description", FilterValue::Null)));
    }

    #[test]
    fn test_check_filter_rejects_unknown_field() {
        assert!(Organization::check_filter(&Filter::by_id(Uuid::new_v4())).is_ok());
        let err = Organization::check_filter(&Filter::new().eq("parentOrganizationId", 1i64))
            .expect_err("unknown field");
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_apply_update() {
        let mut org = sample(Some(Uuid::new_v4()));
        let created = org.updated_at;

        let update = UpdateOrganization {
            name: Some("Renamed".to_string()),
            parent_organization_id: Some(None),
            ..UpdateOrganization::new(org.id)
        };
        update.apply(&mut org);

        assert_eq!(org.name, "Renamed");
        assert!(org.is_root());
        assert!(org.updated_at >= created);
    }

    #[test]
    fn test_hierarchical() {
        let parent = Uuid::new_v4();
        let org = sample(Some(parent));
        assert_eq!(Hierarchical::parent_id(&org), Some(parent));
        assert_eq!(Organization::PARENT_FIELD, "parent_organization_id");
    }
}
