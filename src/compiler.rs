//! The query-descriptor compiler.
//!
//! Compilation is a two-pass pipeline over one [`Compiler`] instance:
//!
//! 1. render the where-tree and sort keys — as a side effect this registers
//!    every relation referenced by a filter or sort into the relation map;
//! 2. overlay the caller's eager relations, normalize the map so every
//!    ancestor is present, and emit joins parents-first.
//!
//! The two-pass shape is load-bearing: join planning consumes the relation
//! map that pass 1 populates, so the predicate and sort keys must be
//! rendered before any join is emitted.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::ast::WhereNode;
use crate::builder::{QueryBuilder, SqlBuilder};
use crate::descriptor::{QueryDescriptor, SortDirection};
use crate::error::{RelqError, RelqResult};
use crate::operators::OperatorTable;
use crate::path;
use crate::schema::ExecutionContext;

/// Compile a descriptor for `entity` into a populated [`SqlBuilder`].
///
/// The builder is returned ready to render or execute, not yet executed.
/// Any failure consumes the builder, so a caller never observes a
/// half-built query.
pub fn compile_query(
    entity: &str,
    descriptor: &QueryDescriptor,
    ctx: &ExecutionContext,
    operators: Option<OperatorTable>,
) -> RelqResult<SqlBuilder> {
    let table = ctx
        .schema
        .canonical_name(entity)
        .ok_or_else(|| RelqError::UnknownEntity(entity.to_string()))?;
    let builder = SqlBuilder::new(table);
    Compiler::new(builder, operators.unwrap_or_default()).compile(descriptor)
}

/// One compile invocation: the alias table, relation map, and operator
/// table live exactly as long as this value.
pub struct Compiler<B: QueryBuilder> {
    builder: B,
    operators: OperatorTable,
    /// Relation path → eager flag. BTreeMap keeps every walk deterministic.
    relations: BTreeMap<String, bool>,
    aliases: HashMap<String, String>,
    next_alias: u32,
}

impl<B: QueryBuilder> Compiler<B> {
    pub fn new(builder: B, operators: OperatorTable) -> Self {
        Self {
            builder,
            operators,
            relations: BTreeMap::new(),
            aliases: HashMap::new(),
            next_alias: 1,
        }
    }

    /// Run the fixed compile sequence and hand back the populated builder.
    pub fn compile(mut self, descriptor: &QueryDescriptor) -> RelqResult<B> {
        self.builder.select_all();

        // Pass 1: render the predicate and sort keys. Dot-path rendering
        // registers filter-only and sort-only relations into the map.
        if let Some(filter) = &descriptor.filter {
            let tree = WhereNode::parse(filter)?;
            let predicate = self.render_where(&tree)?;
            debug!(predicate = %predicate, "where-clause compiled");
            self.builder.filter(&predicate);
        }

        let mut order: Vec<(String, SortDirection)> = Vec::with_capacity(descriptor.sort.len());
        for (attribute, direction) in &descriptor.sort {
            order.push((self.render_attribute(attribute), *direction));
        }

        // Pass 2: overlay eager relations, normalize, emit joins.
        self.plan_joins(&descriptor.relations)?;

        if !descriptor.params.is_empty() {
            self.builder.bind_params(&descriptor.params);
        }
        if !order.is_empty() {
            self.builder.order_by(&order);
        }
        self.apply_pagination(descriptor)?;
        if let Some(directive) = &descriptor.cache {
            self.builder.cache(directive);
        }

        Ok(self.builder)
    }

    /// Short, stable alias for a relation path.
    ///
    /// The empty path maps to the builder's root alias. A first use
    /// registers the path in the relation map (eager defaults to false,
    /// lazily introducing filter-only relations) and draws the next counter
    /// value; repeated calls are idempotent. Counter aliases keep generated
    /// identifiers short regardless of path depth.
    fn alias(&mut self, relation: &str) -> String {
        if relation.is_empty() {
            return self.builder.root_alias().to_string();
        }
        if let Some(alias) = self.aliases.get(relation) {
            return alias.clone();
        }
        self.relations.entry(relation.to_string()).or_insert(false);
        let alias = self.next_alias.to_string();
        self.next_alias += 1;
        self.aliases.insert(relation.to_string(), alias.clone());
        alias
    }

    /// `<parent alias>.<last segment>` — how every attribute reference is
    /// rendered, whether in a predicate, a sort key, or a join target.
    fn aliased_attribute(&mut self, attribute: &str) -> String {
        match path::parent(attribute) {
            Some(parent) => format!("{}.{}", self.alias(parent), path::last_segment(attribute)),
            None => format!("{}.{}", self.builder.root_alias(), attribute),
        }
    }

    /// Render an attribute path from a where-tree or sort map.
    ///
    /// A dotted path names a relation chain: besides aliasing its parent,
    /// the full path itself is registered so join planning covers it. A
    /// single-segment path is a root column and registers nothing.
    fn render_attribute(&mut self, attribute: &str) -> String {
        let rendered = self.aliased_attribute(attribute);
        if path::depth(attribute) > 1 {
            self.alias(attribute);
        }
        rendered
    }

    /// Recursively render a where-tree node into predicate text.
    fn render_where(&mut self, node: &WhereNode) -> RelqResult<String> {
        match node {
            WhereNode::Group(children) => {
                let parts = children
                    .iter()
                    .map(|child| self.render_where(child))
                    .collect::<RelqResult<Vec<_>>>()?;
                Ok(format!("({})", parts.join(" ")))
            }
            WhereNode::Operator(token) => self
                .operators
                .get(token)
                .map(str::to_string)
                .ok_or_else(|| RelqError::InvalidOperation(token.clone())),
            WhereNode::Path(attribute) => Ok(self.render_attribute(attribute)),
            WhereNode::Param(reference) => Ok(reference.clone()),
        }
    }

    /// Complete the relation map: every ancestor of every present path gets
    /// an entry, and an ancestor is eager when it was explicitly requested
    /// or lies on the path to an eager descendant. The flag is a monotonic
    /// OR, so re-running is a no-op.
    fn normalize_relations(&mut self) {
        let entries: Vec<(String, bool)> = self
            .relations
            .iter()
            .map(|(p, eager)| (p.clone(), *eager))
            .collect();
        for (relation, eager) in entries {
            let mut current = relation.as_str();
            while let Some(ancestor) = path::parent(current) {
                let flag = self.relations.entry(ancestor.to_string()).or_insert(false);
                *flag |= eager;
                current = ancestor;
            }
        }
    }

    /// Overlay eager paths, normalize, and emit joins shallow-first.
    ///
    /// Depth order is required, not cosmetic: a join references its
    /// parent's alias, which must already be allocated.
    fn plan_joins(&mut self, eager: &[String]) -> RelqResult<()> {
        for relation in eager {
            self.relations.insert(relation.clone(), true);
        }
        self.normalize_relations();

        let mut planned: Vec<(String, bool)> = self
            .relations
            .iter()
            .map(|(p, selecting)| (p.clone(), *selecting))
            .collect();
        planned.sort_by_key(|(relation, _)| path::depth(relation));

        for (relation, selecting) in planned {
            if !path::is_dot_path(&relation) {
                return Err(RelqError::InvalidPath(relation));
            }
            let attribute = self.aliased_attribute(&relation);
            let alias = self.alias(&relation);
            debug!(relation = %relation, alias = %alias, selecting, "join planned");
            self.builder.join(&attribute, &alias, selecting);
        }
        Ok(())
    }

    fn apply_pagination(&mut self, descriptor: &QueryDescriptor) -> RelqResult<()> {
        let offset = match (descriptor.page, descriptor.limit) {
            (Some(page), Some(limit)) => page * limit,
            (Some(_), None) => return Err(RelqError::PageWithoutLimit),
            _ => descriptor.offset.unwrap_or(0),
        };
        if offset > 0 {
            self.builder.skip(offset);
        }
        if let Some(limit) = descriptor.limit {
            self.builder.take(limit);
        }
        Ok(())
    }
}
