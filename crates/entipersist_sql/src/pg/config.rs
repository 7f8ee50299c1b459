//! PostgreSQL query configuration.

/// Settings shared by the PostgreSQL builders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PgQueryConfig {
    /// Schema that qualifies every table name.
    pub schema: Option<String>,
}

impl PgQueryConfig {
    /// Creates a configuration without a schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the schema.
    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Returns the unquoted, schema-qualified table name.
    pub fn complete_table_name(&self, table_name: &str) -> String {
        match &self.schema {
            Some(schema) if !schema.is_empty() => format!("{schema}.{table_name}"),
            _ => table_name.to_string(),
        }
    }
}
