//! The query-builder seam.
//!
//! The compiler targets the [`QueryBuilder`] capability set rather than a
//! concrete engine. [`SqlBuilder`] is the shipped implementation: it records
//! every instruction and renders a SQL string for inspection or execution.

use std::collections::HashMap;

use serde_json::Value;

use crate::descriptor::SortDirection;

/// Capabilities the compiler requires from an underlying query engine.
///
/// Implementations receive alias-qualified predicate and attribute strings;
/// the compiler guarantees joins arrive parents-first, so a join's
/// attribute reference always names an alias that was already introduced.
pub trait QueryBuilder {
    /// The distinguished alias of the root entity.
    fn root_alias(&self) -> &str;

    /// Select all columns of the root entity.
    fn select_all(&mut self);

    /// Attach the rendered boolean predicate.
    fn filter(&mut self, predicate: &str);

    /// Join `attribute` (e.g. `t.orders`) under `alias`. A selecting join
    /// also fetches the relation's columns; a non-selecting join exists only
    /// to support filtering or ordering.
    fn join(&mut self, attribute: &str, alias: &str, selecting: bool);

    /// Bind the named parameter map wholesale.
    fn bind_params(&mut self, params: &HashMap<String, Value>);

    /// Apply all sort keys as a single ordered instruction.
    fn order_by(&mut self, keys: &[(String, SortDirection)]);

    /// Skip the first `count` rows.
    fn skip(&mut self, count: u64);

    /// Return at most `count` rows.
    fn take(&mut self, count: u64);

    /// Forward an opaque cache directive.
    fn cache(&mut self, directive: &Value);
}

/// One recorded join instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    pub attribute: String,
    pub alias: String,
    pub selecting: bool,
}

/// A recording [`QueryBuilder`] that renders SQL text.
#[derive(Debug, Clone, Default)]
pub struct SqlBuilder {
    table: String,
    select: Vec<String>,
    predicate: Option<String>,
    joins: Vec<JoinClause>,
    params: HashMap<String, Value>,
    order: Vec<(String, SortDirection)>,
    skip: Option<u64>,
    take: Option<u64>,
    cache: Option<Value>,
}

/// Alias of the root entity in generated text.
const ROOT_ALIAS: &str = "t";

impl SqlBuilder {
    /// A builder selecting from `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn predicate(&self) -> Option<&str> {
        self.predicate.as_deref()
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn params(&self) -> &HashMap<String, Value> {
        &self.params
    }

    pub fn order(&self) -> &[(String, SortDirection)] {
        &self.order
    }

    pub fn skip_count(&self) -> Option<u64> {
        self.skip
    }

    pub fn take_count(&self) -> Option<u64> {
        self.take
    }

    pub fn cache_directive(&self) -> Option<&Value> {
        self.cache.as_ref()
    }

    /// Render the recorded query as SQL.
    pub fn to_sql(&self) -> String {
        let mut sql = String::from("SELECT ");

        if self.select.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.select.join(", "));
        }

        sql.push_str(" FROM ");
        sql.push_str(&self.table);
        sql.push(' ');
        sql.push_str(ROOT_ALIAS);

        for join in &self.joins {
            sql.push_str(" LEFT JOIN ");
            sql.push_str(&join.attribute);
            sql.push(' ');
            sql.push_str(&join.alias);
        }

        if let Some(predicate) = &self.predicate {
            sql.push_str(" WHERE ");
            sql.push_str(predicate);
        }

        if !self.order.is_empty() {
            let keys: Vec<String> = self
                .order
                .iter()
                .map(|(attr, dir)| format!("{attr} {dir}"))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&keys.join(", "));
        }

        if let Some(n) = self.take {
            sql.push_str(&format!(" LIMIT {n}"));
        }

        if let Some(n) = self.skip {
            sql.push_str(&format!(" OFFSET {n}"));
        }

        sql
    }
}

impl QueryBuilder for SqlBuilder {
    fn root_alias(&self) -> &str {
        ROOT_ALIAS
    }

    fn select_all(&mut self) {
        self.select.push(format!("{ROOT_ALIAS}.*"));
    }

    fn filter(&mut self, predicate: &str) {
        self.predicate = Some(predicate.to_string());
    }

    fn join(&mut self, attribute: &str, alias: &str, selecting: bool) {
        if selecting {
            self.select.push(format!("{alias}.*"));
        }
        self.joins.push(JoinClause {
            attribute: attribute.to_string(),
            alias: alias.to_string(),
            selecting,
        });
    }

    fn bind_params(&mut self, params: &HashMap<String, Value>) {
        self.params.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    fn order_by(&mut self, keys: &[(String, SortDirection)]) {
        self.order = keys.to_vec();
    }

    fn skip(&mut self, count: u64) {
        self.skip = Some(count);
    }

    fn take(&mut self, count: u64) {
        self.take = Some(count);
    }

    fn cache(&mut self, directive: &Value) {
        self.cache = Some(directive.clone());
    }
}
