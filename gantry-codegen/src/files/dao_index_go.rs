use std::path::{Path, PathBuf};

use gantry_core::{FileRules, GeneratedFile, Overwrite, to_camel_lower, to_snake_case};

use crate::CodeBuilder;

/// The hand-editable dao index scaffold for one table.
///
/// Created once, never overwritten: it embeds the regenerated internal DAO
/// and registers the table's globally accessible object keyed by type name.
/// Deliberately carries no sentinel so later runs classify it as foreign.
pub struct DaoIndexGo<'a> {
    table: &'a str,
    entity_name: &'a str,
    /// Go import path of the generated `internal` package.
    import_prefix: &'a str,
}

impl<'a> DaoIndexGo<'a> {
    pub fn new(table: &'a str, entity_name: &'a str, import_prefix: &'a str) -> Self {
        Self {
            table,
            entity_name,
            import_prefix,
        }
    }
}

impl GeneratedFile for DaoIndexGo<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(format!("{}.go", to_snake_case(self.entity_name)))
    }

    fn rules(&self) -> FileRules {
        FileRules {
            overwrite: Overwrite::IfMissing,
        }
    }

    fn render(&self) -> String {
        let name = self.entity_name;
        let dao_type = format!("{}Dao", to_camel_lower(name));

        CodeBuilder::new()
            .line("// =========================================================================")
            .line("// This file is auto-generated once by gantry. Fill it as you wish.")
            .line("// =========================================================================")
            .blank()
            .line("package dao")
            .blank()
            .block("import (", ")", |b| {
                b.line(&format!("\"{}\"", self.import_prefix))
            })
            .blank()
            .comment(&format!(
                "{} is the data access object for the table {}.",
                dao_type, self.table
            ))
            .comment("You can define custom methods on it to extend its functionality.")
            .block(&format!("type {} struct {{", dao_type), "}", |b| {
                b.line(&format!("*internal.{}Dao", name))
            })
            .blank()
            .block("var (", ")", |b| {
                b.comment(&format!(
                    "{} is a globally accessible object for table {} operations.",
                    name, self.table
                ))
                .line(&format!("{} = {}{{internal.New{}Dao()}}", name, dao_type, name))
            })
            .build()
    }
}

#[cfg(test)]
mod tests {
    use gantry_core::classify;

    use super::*;

    #[test]
    fn test_render_registration() {
        let file = DaoIndexGo::new("user", "User", "app/dao/internal");
        let rendered = file.render();

        assert!(rendered.contains("package dao"));
        assert!(rendered.contains("\"app/dao/internal\""));
        assert!(rendered.contains("type userDao struct {"));
        assert!(rendered.contains("\t*internal.UserDao\n"));
        assert!(rendered.contains("\tUser = userDao{internal.NewUserDao()}\n"));
    }

    #[test]
    fn test_scaffold_is_create_once_and_foreign() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = DaoIndexGo::new("user", "User", "app/dao/internal");

        assert_eq!(file.rules().overwrite, Overwrite::IfMissing);
        file.write(temp.path()).unwrap();
        // No sentinel: a later machine-owned write at this path must refuse.
        assert_eq!(
            classify(&file.path(temp.path())).unwrap(),
            gantry_core::FileClass::Foreign
        );
    }
}
