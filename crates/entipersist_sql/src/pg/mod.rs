//! PostgreSQL builders.

mod chain;
mod column;
mod config;
mod function;
mod utils;
mod where_clause;

pub use chain::{PgChainBuilder, PgChainBuilderFactory, PgConnective};
pub use column::PgColumnBuilder;
pub use config::PgQueryConfig;
pub use function::{PgAggregate, PgFunctionBuilder};
pub use utils::{number_placeholders, quote_identifier, quote_table_column, quote_table_name};
pub use where_clause::build_where_clause;
