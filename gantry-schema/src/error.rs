use miette::Diagnostic;
use thiserror::Error;

/// Errors raised by schema introspection and type mapping.
#[derive(Debug, Error, Diagnostic)]
pub enum SchemaError {
    #[error("database access failed: {context}")]
    #[diagnostic(
        code(gantry::schema_access),
        help("check the database path and that no other process holds an exclusive lock")
    )]
    Access {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("table '{table}' not found in database")]
    #[diagnostic(
        code(gantry::table_not_found),
        help("the explicit --tables filter must name existing tables")
    )]
    TableNotFound { table: String },

    #[error("no type mapping for column '{table}.{column}' with native type '{native_type}'")]
    #[diagnostic(
        code(gantry::unmapped_type),
        help("add a [type_mapping] or [field_mapping] override to gantry.toml")
    )]
    UnmappedType {
        table: String,
        column: String,
        native_type: String,
    },

    #[error("duplicate generated field name '{field}' in table '{table}'")]
    #[diagnostic(help("two column names collapse to the same Go identifier; rename one column"))]
    DuplicateField { table: String, field: String },
}

impl SchemaError {
    pub fn access(context: impl Into<String>, source: rusqlite::Error) -> Box<Self> {
        Box::new(SchemaError::Access {
            context: context.into(),
            source,
        })
    }
}
