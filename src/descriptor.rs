//! The query descriptor: the JSON-shaped input contract.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RelqError, RelqResult};

/// A declarative query, typically deserialized straight from a request
/// payload.
///
/// ```json
/// {
///   "where": [["status"], "$eq", ":active"],
///   "params": { "active": true },
///   "relations": ["profile", "orders.items"],
///   "sort": { "name": "ASC" },
///   "limit": 10,
///   "page": 2
/// }
/// ```
///
/// The descriptor is immutable for the duration of a compile and owned by
/// the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// Nested where-expression tree, as raw JSON. Classified during compile.
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,

    /// Named parameter bindings referenced from the where-tree as `:name`.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, Value>,

    /// Relation paths to join and eagerly select.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<String>,

    /// Relation-qualified attribute paths mapped to a sort direction.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sort: BTreeMap<String, SortDirection>,

    /// Explicit row offset. Ignored when `page` and `limit` are both set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    /// Maximum row count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    /// Zero-based page index; requires `limit`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,

    /// Opaque cache directive, forwarded to the builder untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<Value>,
}

impl QueryDescriptor {
    /// Deserialize a descriptor from a JSON string.
    pub fn from_json(input: &str) -> RelqResult<Self> {
        serde_json::from_str(input).map_err(|e| RelqError::Descriptor(e.to_string()))
    }
}

/// Sort direction for one order-by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Asc,
    #[serde(alias = "desc")]
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_full() {
        let descriptor = QueryDescriptor::from_json(
            r#"{
                "where": ["status", "$eq", ":active"],
                "params": { "active": true },
                "relations": ["profile", "orders.items"],
                "sort": { "name": "ASC", "profile.city": "desc" },
                "limit": 10,
                "page": 2,
                "cache": 60
            }"#,
        )
        .unwrap();

        assert_eq!(descriptor.filter, Some(json!(["status", "$eq", ":active"])));
        assert_eq!(descriptor.params.get("active"), Some(&json!(true)));
        assert_eq!(descriptor.relations, vec!["profile", "orders.items"]);
        assert_eq!(descriptor.sort.get("name"), Some(&SortDirection::Asc));
        assert_eq!(
            descriptor.sort.get("profile.city"),
            Some(&SortDirection::Desc)
        );
        assert_eq!(descriptor.limit, Some(10));
        assert_eq!(descriptor.page, Some(2));
        assert_eq!(descriptor.offset, None);
        assert_eq!(descriptor.cache, Some(json!(60)));
    }

    #[test]
    fn test_from_json_defaults() {
        let descriptor = QueryDescriptor::from_json("{}").unwrap();
        assert!(descriptor.filter.is_none());
        assert!(descriptor.params.is_empty());
        assert!(descriptor.relations.is_empty());
        assert!(descriptor.sort.is_empty());
        assert_eq!(descriptor.offset, None);
        assert_eq!(descriptor.limit, None);
        assert_eq!(descriptor.page, None);
        assert!(descriptor.cache.is_none());
    }

    #[test]
    fn test_from_json_malformed() {
        let err = QueryDescriptor::from_json("{ not json").unwrap_err();
        assert!(matches!(err, RelqError::Descriptor(_)));
    }

    #[test]
    fn test_sort_direction_display() {
        assert_eq!(SortDirection::Asc.to_string(), "ASC");
        assert_eq!(SortDirection::Desc.to_string(), "DESC");
    }
}
