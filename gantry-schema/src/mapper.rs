//! Column-to-Go type mapping.
//!
//! Maps a column's native type to a Go type per output layer, applying user
//! overrides from `gantry.toml` before the built-in table.

use gantry_core::{GantryConfig, to_camel_lower, to_pascal_case};
use indexmap::IndexSet;

use crate::{column::ColumnDescriptor, error::SchemaError};

/// The output layer a field is mapped for. Nullability handling differs
/// between layers: the data-object layer uses pointer types so that absent
/// columns can be told apart from zero values, the entity layer does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    DaoInternal,
    DataObject,
    Entity,
}

/// One mapped struct field for a generated Go file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Exported Go field name (PascalCase of the column name).
    pub name: String,
    /// Source column name, as reported by the backend.
    pub column: String,
    /// Fully rendered Go type, pointer-wrapped where the layer requires it.
    pub go_type: String,
    /// Struct tag without surrounding backticks; empty for dao-internal.
    pub tag: String,
    /// Doc comment line, taken from the column comment when present.
    pub doc_comment: Option<String>,
    /// Import path the file must carry for this field's type.
    pub import: Option<String>,
}

/// Resolves Go types for columns: `field_mapping` wins over `type_mapping`,
/// which wins over the built-in table.
pub struct TypeMapper<'a> {
    config: &'a GantryConfig,
}

impl<'a> TypeMapper<'a> {
    pub fn new(config: &'a GantryConfig) -> Self {
        Self { config }
    }

    /// Map every column of a table for the given layer, preserving column
    /// order. Fails on the first unmapped type or duplicate field name.
    pub fn map_table(
        &self,
        table: &str,
        columns: &[ColumnDescriptor],
        layer: Layer,
    ) -> Result<Vec<FieldDescriptor>, Box<SchemaError>> {
        let mut fields = Vec::with_capacity(columns.len());
        let mut seen: IndexSet<String> = IndexSet::new();
        for column in columns {
            let field = self.map_column(table, column, layer)?;
            if !seen.insert(field.name.clone()) {
                return Err(Box::new(SchemaError::DuplicateField {
                    table: table.to_string(),
                    field: field.name,
                }));
            }
            fields.push(field);
        }
        Ok(fields)
    }

    /// Map a single column for the given layer.
    pub fn map_column(
        &self,
        table: &str,
        column: &ColumnDescriptor,
        layer: Layer,
    ) -> Result<FieldDescriptor, Box<SchemaError>> {
        let (base_type, import) = self.resolve_type(table, column)?;

        let go_type = if layer == Layer::DataObject && column.nullable {
            format!("*{}", base_type)
        } else {
            base_type
        };

        let json_name = to_camel_lower(&column.name);
        let tag = match layer {
            Layer::DaoInternal => String::new(),
            Layer::DataObject => {
                format!("orm:\"{}\" json:\"{},omitempty\"", column.name, json_name)
            }
            Layer::Entity => format!("orm:\"{}\" json:\"{}\"", column.name, json_name),
        };

        Ok(FieldDescriptor {
            name: to_pascal_case(&column.name),
            column: column.name.clone(),
            go_type,
            tag,
            doc_comment: column.comment.clone(),
            import,
        })
    }

    fn resolve_type(
        &self,
        table: &str,
        column: &ColumnDescriptor,
    ) -> Result<(String, Option<String>), Box<SchemaError>> {
        if let Some(ov) = self.config.field_override(table, &column.name) {
            return Ok((ov.go_type.clone(), ov.import.clone()));
        }

        let normalized = normalize_native_type(&column.native_type);
        if let Some(ov) = self.config.type_override(&normalized) {
            return Ok((ov.go_type.clone(), ov.import.clone()));
        }

        match builtin_go_type(&normalized) {
            Some((go_type, import)) => Ok((go_type.to_string(), import.map(String::from))),
            None => Err(Box::new(SchemaError::UnmappedType {
                table: table.to_string(),
                column: column.name.clone(),
                native_type: column.native_type.clone(),
            })),
        }
    }
}

/// Lowercase the native type and strip the size suffix and an `unsigned`
/// qualifier: `VARCHAR(64)` -> `varchar`, `INT(10) UNSIGNED` -> `int`.
fn normalize_native_type(native: &str) -> String {
    let lower = native.to_lowercase();
    let without_size = match lower.find('(') {
        Some(open) => {
            let rest = lower[open..].find(')').map(|c| &lower[open + c + 1..]);
            format!("{}{}", &lower[..open], rest.unwrap_or(""))
        }
        None => lower,
    };
    without_size
        .replace(" unsigned", "")
        .trim()
        .to_string()
}

fn builtin_go_type(normalized: &str) -> Option<(&'static str, Option<&'static str>)> {
    let mapped = match normalized {
        "tinyint" | "smallint" | "mediumint" | "int" => ("int", None),
        "bigint" | "integer" => ("int64", None),
        "float" | "double" | "real" | "decimal" | "money" | "smallmoney" | "numeric" => {
            ("float64", None)
        }
        "bool" | "boolean" | "bit" => ("bool", None),
        "char" | "varchar" | "nchar" | "nvarchar" | "text" | "tinytext" | "mediumtext"
        | "longtext" => ("string", None),
        "date" | "datetime" | "timestamp" | "timestamptz" => ("time.Time", Some("time")),
        "blob" | "tinyblob" | "mediumblob" | "longblob" | "binary" | "varbinary" | "bytea" => {
            ("[]byte", None)
        }
        "json" | "jsonb" => ("string", None),
        _ => return None,
    };
    Some(mapped)
}
