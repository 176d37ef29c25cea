//! # relq — declarative query descriptors, compiled
//!
//! relq turns a JSON-shaped query descriptor — nested filter expressions,
//! relation selections, sort, pagination, parameter bindings, cache
//! directives — into a relational query against an entity schema.
//!
//! ## Quick Example
//!
//! ```rust
//! use relq::prelude::*;
//!
//! let descriptor = QueryDescriptor::from_json(r#"{
//!     "where": ["status", "$eq", ":active"],
//!     "params": { "active": true },
//!     "relations": ["profile"],
//!     "limit": 10
//! }"#).unwrap();
//!
//! let schema = StaticSchema::new().entity("user", "app_user");
//! let ctx = ExecutionContext::new(&schema);
//! let builder = relq::compile("user", &descriptor, &ctx, None).unwrap();
//!
//! assert_eq!(
//!     builder.to_sql(),
//!     "SELECT t.*, 1.* FROM app_user t LEFT JOIN t.profile 1 \
//!      WHERE (t.status = :active) LIMIT 10"
//! );
//! ```
//!
//! ## Descriptor Tokens
//!
//! | Token form  | Kind                | Example          |
//! |-------------|---------------------|------------------|
//! | `$name`     | Operator keyword    | `$eq`, `$in`     |
//! | `a.b.c`     | Relation/attribute  | `profile.city`   |
//! | `:name`     | Parameter reference | `:active`        |
//!
//! Relations referenced anywhere — eager-load list, filters, sorts — are
//! joined automatically, parents before children, with short numeric
//! aliases.

pub mod ast;
pub mod builder;
pub mod compiler;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod operators;
pub mod path;
pub mod schema;

pub mod prelude {
    pub use crate::ast::WhereNode;
    pub use crate::builder::{JoinClause, QueryBuilder, SqlBuilder};
    pub use crate::compiler::{compile_query, Compiler};
    pub use crate::descriptor::{QueryDescriptor, SortDirection};
    pub use crate::engine::QueryDb;
    pub use crate::error::{RelqError, RelqResult};
    pub use crate::operators::OperatorTable;
    pub use crate::schema::{ExecutionContext, SchemaProvider, StaticSchema};
}

use builder::SqlBuilder;
use descriptor::QueryDescriptor;
use error::RelqResult;
use operators::OperatorTable;
use schema::ExecutionContext;

/// Compile a query descriptor for `entity` into a populated builder.
///
/// The returned builder is ready to render or execute, not yet executed.
pub fn compile(
    entity: &str,
    descriptor: &QueryDescriptor,
    ctx: &ExecutionContext,
    operators: Option<OperatorTable>,
) -> RelqResult<SqlBuilder> {
    compiler::compile_query(entity, descriptor, ctx, operators)
}
