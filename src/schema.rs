//! Schema metadata: resolving entity identifiers to canonical names.

use std::collections::HashMap;

/// Resolves an entity identifier to the canonical name used for the root
/// of the generated query.
pub trait SchemaProvider {
    /// Canonical name for `entity`, or `None` when the entity is unknown.
    fn canonical_name(&self, entity: &str) -> Option<String>;
}

/// A fixed entity → canonical-name mapping.
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    entities: HashMap<String, String>,
}

impl StaticSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity, builder-style.
    pub fn entity(mut self, id: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.entities.insert(id.into(), canonical.into());
        self
    }
}

impl SchemaProvider for StaticSchema {
    fn canonical_name(&self, entity: &str) -> Option<String> {
        self.entities.get(entity).cloned()
    }
}

/// Per-compile context handed to the entry point.
pub struct ExecutionContext<'a> {
    pub schema: &'a dyn SchemaProvider,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(schema: &'a dyn SchemaProvider) -> Self {
        Self { schema }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_schema() {
        let schema = StaticSchema::new().entity("user", "app_user");
        assert_eq!(schema.canonical_name("user"), Some("app_user".to_string()));
        assert_eq!(schema.canonical_name("order"), None);
    }
}
