use std::path::{Path, PathBuf};

use gantry_core::{FileRules, GeneratedFile, SENTINEL, to_snake_case};
use gantry_schema::FieldDescriptor;

use crate::CodeBuilder;

use super::{import_block, struct_field_lines};

/// The machine-owned entity file for one table: the fully hydrated row
/// shape with plain value types throughout.
pub struct EntityGo<'a> {
    table: &'a str,
    entity_name: &'a str,
    fields: &'a [FieldDescriptor],
}

impl<'a> EntityGo<'a> {
    pub fn new(table: &'a str, entity_name: &'a str, fields: &'a [FieldDescriptor]) -> Self {
        Self {
            table,
            entity_name,
            fields,
        }
    }
}

impl GeneratedFile for EntityGo<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("entity")
            .join(format!("{}.go", to_snake_case(self.entity_name)))
    }

    fn rules(&self) -> FileRules {
        FileRules::default()
    }

    fn render(&self) -> String {
        let builder = CodeBuilder::new()
            .line(SENTINEL)
            .blank()
            .line("package entity")
            .blank();
        import_block(builder, self.fields)
            .comment(&format!(
                "{} is the golang structure of the table {}.",
                self.entity_name, self.table
            ))
            .block(
                &format!("type {} struct {{", self.entity_name),
                "}",
                |b| b.each(struct_field_lines(self.fields), |b, line| b.line(&line)),
            )
            .build()
    }
}
