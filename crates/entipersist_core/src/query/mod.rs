//! Query DSL: condition trees, sort specifications and the in-memory
//! matcher compiler.

mod condition;
mod matcher;
mod sort;

pub use condition::{Condition, Predicate, Where};
pub use matcher::{build_matcher_from_where, Matcher};
pub use sort::{Sort, SortDirection, SortOrder};
