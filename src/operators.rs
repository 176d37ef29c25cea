//! The operator table: where-tree keyword tokens mapped to backend syntax.

use std::collections::HashMap;

/// Mapping from operator tokens (`$eq`, `$in`, ...) to the predicate syntax
/// they render as.
///
/// The table is an explicit configuration value handed to the compiler;
/// callers can extend or override individual entries. A token missing from
/// the table fails compilation with an invalid-operation error.
#[derive(Debug, Clone)]
pub struct OperatorTable {
    entries: HashMap<String, String>,
}

impl OperatorTable {
    /// An empty table with no recognized operators.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Look up the rendered syntax for an operator token.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    /// Insert or override a single mapping.
    pub fn insert(&mut self, token: impl Into<String>, syntax: impl Into<String>) {
        self.entries.insert(token.into(), syntax.into());
    }

    /// Builder-style insert, for chaining overrides onto the defaults.
    pub fn with(mut self, token: impl Into<String>, syntax: impl Into<String>) -> Self {
        self.insert(token, syntax);
        self
    }

    /// Tokens in this table, sorted.
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens
    }
}

impl Default for OperatorTable {
    /// The default operator set.
    fn default() -> Self {
        let defaults = [
            ("$not", "NOT"),
            ("$and", "AND"),
            ("$or", "OR"),
            ("$lt", "<"),
            ("$lte", "<="),
            ("$gt", ">"),
            ("$gte", ">="),
            ("$eq", "="),
            ("$ne", "<>"),
            ("$like", "LIKE"),
            ("$ilike", "ILIKE"),
            ("$in", "IN"),
            ("$notin", "NOT IN"),
            ("$isnull", "IS NULL"),
            ("$isnotnull", "IS NOT NULL"),
            ("$between", "BETWEEN"),
            ("$any", "ANY"),
            ("$some", "SOME"),
        ];
        Self {
            entries: defaults
                .into_iter()
                .map(|(token, syntax)| (token.to_string(), syntax.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_entries() {
        let table = OperatorTable::default();
        assert_eq!(table.get("$eq"), Some("="));
        assert_eq!(table.get("$ne"), Some("<>"));
        assert_eq!(table.get("$notin"), Some("NOT IN"));
        assert_eq!(table.get("$isnotnull"), Some("IS NOT NULL"));
        assert_eq!(table.get("$some"), Some("SOME"));
        assert_eq!(table.tokens().len(), 18);
    }

    #[test]
    fn test_unknown_token() {
        assert_eq!(OperatorTable::default().get("$regex"), None);
    }

    #[test]
    fn test_override() {
        let table = OperatorTable::default().with("$ne", "!=").with("$regex", "~");
        assert_eq!(table.get("$ne"), Some("!="));
        assert_eq!(table.get("$regex"), Some("~"));
    }
}
