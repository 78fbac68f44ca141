//! Equality filters for record selection.
//!
//! A [`Filter`] is a set of `field = value` predicates; a record matches when
//! every predicate holds. There are no range or pattern operators.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the identifying field every record carries.
pub const ID_FIELD: &str = "id";

/// A dynamic filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Null / no value.
    Null,
    /// A boolean value.
    Boolean(bool),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A UUID value.
    Uuid(Uuid),
    /// A string value.
    String(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Uuid(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A set of equality predicates keyed by field name.
///
/// Fields are kept sorted so generated queries are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter {
    fields: BTreeMap<String, FilterValue>,
}

impl Filter {
    /// An empty filter, matching every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an equality predicate.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Shorthand for `{id: value}`.
    pub fn by_id(id: impl Into<FilterValue>) -> Self {
        Self::new().eq(ID_FIELD, id)
    }

    /// Expected value for `field`, if constrained.
    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.fields.get(field)
    }

    /// Iterate predicates in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether the filter has no predicates.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of predicates.
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (field, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{field}: {value}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_replaces_existing_field() {
        let filter = Filter::new().eq("name", "a").eq("name", "b");
        assert_eq!(filter.len(), 1);
        assert_eq!(filter.get("name"), Some(&FilterValue::String("b".into())));
    }

    #[test]
    fn test_by_id() {
        let filter = Filter::by_id(7i64);
        assert_eq!(filter.get(ID_FIELD), Some(&FilterValue::Integer(7)));
    }

    #[test]
    fn test_option_maps_to_null() {
        let none: Option<Uuid> = None;
        assert_eq!(FilterValue::from(none), FilterValue::Null);
    }

    #[test]
    fn test_display_is_sorted() {
        let filter = Filter::new().eq("parent_organization_id", 1i64).eq("id", 2i64);
        assert_eq!(filter.to_string(), "{id: 2, parent_organization_id: 1}");
        assert_eq!(Filter::new().to_string(), "{}");
    }

    #[test]
    fn test_serde_as_plain_map() {
        let filter = Filter::new().eq("name", "acme").eq("active", true);
        let json = serde_json::to_value(&filter).expect("serialize");
        assert_eq!(json, serde_json::json!({ "active": true, "name": "acme" }));
    }
}
