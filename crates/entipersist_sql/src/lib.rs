//! # EntiPersist SQL
//!
//! Lowers [`Where`](entipersist_core::Where) trees into parameterized SQL
//! fragments.
//!
//! This crate provides:
//! - [`QueryBuilder`], [`ChainQueryBuilder`] and
//!   [`ChainQueryBuilderFactory`], the backend-neutral builder contracts
//! - [`build_chain`], the recursive AND/OR lowering algorithm
//! - PostgreSQL builders: [`PgChainBuilder`], [`PgFunctionBuilder`]
//!   (`array_agg`, `jsonb_agg`) and [`PgColumnBuilder`]
//! - [`build_where_clause`] for a complete `WHERE` body
//!
//! ## Usage
//!
//! ```rust
//! use entipersist_core::{EntityField, EntityMetadata, Where};
//! use entipersist_sql::{build_where_clause, PgQueryConfig};
//!
//! let users = EntityMetadata::new("users", "id")
//!     .with_field(EntityField::new("id", "id"))
//!     .with_field(EntityField::new("age", "age"));
//!
//! let (sql, values) = build_where_clause(
//!     &PgQueryConfig::new(),
//!     &users,
//!     &Where::property_between("age", 18, 30),
//! )
//! .unwrap();
//!
//! assert_eq!(sql, r#""users"."age" BETWEEN $1 AND $2"#);
//! assert_eq!(values.len(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod chain;
mod error;
mod pg;

pub use chain::{
    build_chain, ChainQueryBuilder, ChainQueryBuilderFactory, QueryBuilder, QueryFragment,
    QueryValueFactory,
};
pub use error::{QueryError, QueryResult};
pub use pg::{
    build_where_clause, number_placeholders, quote_identifier, quote_table_column,
    quote_table_name, PgAggregate, PgChainBuilder, PgChainBuilderFactory, PgColumnBuilder,
    PgConnective, PgFunctionBuilder, PgQueryConfig,
};
