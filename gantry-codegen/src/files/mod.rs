//! One module per generated Go file kind.

mod dao_index_go;
mod dao_internal_go;
mod do_go;
mod entity_go;
mod service_go;

pub use dao_index_go::DaoIndexGo;
pub use dao_internal_go::DaoInternalGo;
pub use do_go::DoGo;
pub use entity_go::EntityGo;
pub use service_go::ServiceGo;

use gantry_schema::FieldDescriptor;
use indexmap::IndexSet;

use crate::CodeBuilder;

/// Pad `s` to `width` with trailing spaces.
fn pad(s: &str, width: usize) -> String {
    format!("{:<width$}", s)
}

/// Render a gofmt-style aligned struct field block: names and types padded
/// to their column widths, tags in backticks.
fn struct_field_lines(fields: &[FieldDescriptor]) -> Vec<String> {
    let name_width = fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let type_width = fields.iter().map(|f| f.go_type.len()).max().unwrap_or(0);

    let mut lines = Vec::new();
    for field in fields {
        if let Some(doc) = &field.doc_comment {
            lines.push(format!("// {}", doc));
        }
        if field.tag.is_empty() {
            lines.push(format!(
                "{} {}",
                pad(&field.name, name_width),
                field.go_type
            ));
        } else {
            lines.push(format!(
                "{} {} `{}`",
                pad(&field.name, name_width),
                pad(&field.go_type, type_width),
                field.tag
            ));
        }
    }
    lines
}

/// Append an import block for the distinct imports the fields require,
/// in first-use order.
fn import_block(builder: CodeBuilder, fields: &[FieldDescriptor]) -> CodeBuilder {
    let imports: IndexSet<&str> = fields
        .iter()
        .filter_map(|f| f.import.as_deref())
        .collect();
    if imports.is_empty() {
        return builder;
    }
    builder
        .block("import (", ")", |b| {
            b.each(imports, |b, import| b.line(&format!("\"{}\"", import)))
        })
        .blank()
}
