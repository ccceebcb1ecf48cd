use std::path::{Path, PathBuf};

use gantry_core::{FileRules, GeneratedFile, SENTINEL, to_camel_lower, to_snake_case};
use gantry_schema::FieldDescriptor;

use crate::CodeBuilder;

use super::pad;

/// The machine-owned dao plumbing file for one table: the DAO object and
/// its column-name constants, regenerated every run.
pub struct DaoInternalGo<'a> {
    table: &'a str,
    entity_name: &'a str,
    fields: &'a [FieldDescriptor],
}

impl<'a> DaoInternalGo<'a> {
    pub fn new(table: &'a str, entity_name: &'a str, fields: &'a [FieldDescriptor]) -> Self {
        Self {
            table,
            entity_name,
            fields,
        }
    }
}

impl GeneratedFile for DaoInternalGo<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("internal")
            .join(format!("{}.go", to_snake_case(self.entity_name)))
    }

    fn rules(&self) -> FileRules {
        FileRules::default()
    }

    fn render(&self) -> String {
        let name = self.entity_name;
        let columns_var = format!("{}Columns", to_camel_lower(name));
        let name_width = self
            .fields
            .iter()
            .map(|f| f.name.len())
            .max()
            .unwrap_or(0);

        CodeBuilder::new()
            .line(SENTINEL)
            .blank()
            .line("package internal")
            .blank()
            .comment(&format!(
                "{}Dao is the data access object for the table {}.",
                name, self.table
            ))
            .block(&format!("type {}Dao struct {{", name), "}", |b| {
                b.line("table   string")
                    .line(&format!("columns {}Columns", name))
            })
            .blank()
            .comment(&format!(
                "{}Columns holds the column names of the table {}.",
                name, self.table
            ))
            .block(&format!("type {}Columns struct {{", name), "}", |b| {
                b.each(self.fields, |b, f| {
                    b.line(&format!("{} string", pad(&f.name, name_width)))
                })
            })
            .blank()
            .block(
                &format!("var {} = {}Columns{{", columns_var, name),
                "}",
                |b| {
                    b.each(self.fields, |b, f| {
                        let key = format!("{}:", f.name);
                        b.line(&format!("{} \"{}\",", pad(&key, name_width + 1), f.column))
                    })
                },
            )
            .blank()
            .comment(&format!(
                "New{}Dao creates and returns a new DAO object for table access.",
                name
            ))
            .block(&format!("func New{}Dao() *{}Dao {{", name, name), "}", |b| {
                b.block(&format!("return &{}Dao{{", name), "}", |b| {
                    b.line(&format!("table:   \"{}\",", self.table))
                        .line(&format!("columns: {},", columns_var))
                })
            })
            .blank()
            .comment("Table returns the name of the table.")
            .block(
                &format!("func (dao *{}Dao) Table() string {{", name),
                "}",
                |b| b.line("return dao.table"),
            )
            .blank()
            .comment("Columns returns the column names of the table.")
            .block(
                &format!("func (dao *{}Dao) Columns() {}Columns {{", name, name),
                "}",
                |b| b.line("return dao.columns"),
            )
            .build()
    }
}
