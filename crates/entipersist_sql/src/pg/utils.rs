//! PostgreSQL quoting and parameter numbering.

use crate::chain::QueryBuilder;
use entipersist_core::Value;

/// Quotes one identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quotes a possibly schema-qualified table name (`schema.table`).
pub fn quote_table_name(table: &str) -> String {
    table
        .split('.')
        .map(quote_identifier)
        .collect::<Vec<_>>()
        .join(".")
}

/// Quotes a column qualified by its table.
pub fn quote_table_column(table: &str, column: &str) -> String {
    if table.is_empty() {
        quote_identifier(column)
    } else {
        format!("{}.{}", quote_table_name(table), quote_identifier(column))
    }
}

/// Rewrites `?` markers into `$1..$n`, leaving quoted identifiers alone.
pub fn number_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut index = 0;
    let mut in_identifier = false;
    for ch in sql.chars() {
        match ch {
            '"' => {
                in_identifier = !in_identifier;
                out.push(ch);
            }
            '?' if !in_identifier => {
                index += 1;
                out.push('$');
                out.push_str(&index.to_string());
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Renders a builder with numbered parameters.
pub(crate) fn build_numbered(builder: &dyn QueryBuilder) -> (String, Vec<Value>) {
    (
        number_placeholders(&builder.build_query_string()),
        builder.build_query_values(),
    )
}
