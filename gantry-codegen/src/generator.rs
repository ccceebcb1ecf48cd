//! Per-mode generators: render, reconcile, and report per-item outcomes.

use std::path::{Path, PathBuf};

use gantry_core::{
    FileClass, GantryConfig, GeneratedFile, NameCase, WriteError, WriteResult, classify,
    to_pascal_case,
};
use gantry_resolve::ResolvedContract;
use gantry_schema::{ColumnDescriptor, FieldDescriptor, Layer, TypeMapper};
use indexmap::{IndexMap, IndexSet};
use miette::Report;

use crate::files::{DaoIndexGo, DaoInternalGo, DoGo, EntityGo, ServiceGo};

/// A rendered file that was not written to disk.
#[derive(Debug)]
pub struct PreviewFile {
    /// Path relative to the output directory.
    pub path: String,
    pub content: String,
}

/// A per-item failure, reported at the end of the run.
#[derive(Debug)]
pub struct ItemFailure {
    /// The table or type the failure is isolated to.
    pub item: String,
    pub error: Report,
}

/// Rendered output of a dry run, with failures collected per item.
#[derive(Debug, Default)]
pub struct Preview {
    pub files: Vec<PreviewFile>,
    pub failures: Vec<ItemFailure>,
}

/// Outcome of a generation run. Paths are relative to the output directory.
#[derive(Debug, Default)]
pub struct GenerateResult {
    pub written: Vec<String>,
    pub unchanged: Vec<String>,
    pub skipped: Vec<String>,
    pub failures: Vec<ItemFailure>,
}

impl GenerateResult {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, path: String, outcome: WriteResult) {
        match outcome {
            WriteResult::Written => self.written.push(path),
            WriteResult::Unchanged => self.unchanged.push(path),
            WriteResult::Skipped => self.skipped.push(path),
        }
    }
}

/// Outcome of clearing orphaned machine-owned files.
#[derive(Debug, Default)]
pub struct ClearResult {
    /// Machine-owned orphans that were deleted.
    pub deleted: Vec<String>,
    /// Orphan paths left alone because they lack the sentinel.
    pub kept_foreign: Vec<String>,
}

/// Generates one service interface file per resolved contract.
pub struct ServiceGenerator<'a> {
    contracts: &'a [ResolvedContract],
    name_case: NameCase,
}

impl<'a> ServiceGenerator<'a> {
    pub fn new(contracts: &'a [ResolvedContract], name_case: NameCase) -> Self {
        Self {
            contracts,
            name_case,
        }
    }

    pub fn preview(&self) -> Preview {
        let files = self
            .contracts
            .iter()
            .map(|contract| {
                let file = ServiceGo::new(contract, self.name_case);
                PreviewFile {
                    path: file.file_name(),
                    content: file.render(),
                }
            })
            .collect();
        Preview {
            files,
            failures: Vec::new(),
        }
    }

    pub fn generate(&self, dst: &Path) -> GenerateResult {
        let mut result = GenerateResult::default();
        for contract in self.contracts {
            let file = ServiceGo::new(contract, self.name_case);
            let path = file.file_name();
            match file.write(dst) {
                Ok(outcome) => result.record(path, outcome),
                Err(error) => result.failures.push(ItemFailure {
                    item: contract.type_name.clone(),
                    error: Report::new(error),
                }),
            }
        }
        result
    }

    /// Delete machine-owned `.go` files in `dst` that this run does not
    /// produce. Files without the sentinel are never touched.
    pub fn clear(&self, dst: &Path) -> Result<ClearResult, WriteError> {
        let mut result = ClearResult::default();
        if !dst.exists() {
            return Ok(result);
        }

        let expected: IndexSet<PathBuf> = self
            .contracts
            .iter()
            .map(|c| dst.join(ServiceGo::new(c, self.name_case).file_name()))
            .collect();

        let io_err = |e| WriteError::Io {
            path: dst.to_path_buf(),
            source: e,
        };
        let mut entries: Vec<PathBuf> = std::fs::read_dir(dst)
            .map_err(io_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_err)?
            .into_iter()
            .map(|e| e.path())
            .collect();
        entries.sort();

        for path in entries {
            if path.extension().is_none_or(|ext| ext != "go")
                || !path.is_file()
                || expected.contains(&path)
            {
                continue;
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match classify(&path)? {
                FileClass::MachineOwned => {
                    std::fs::remove_file(&path).map_err(|e| WriteError::Io {
                        path: path.clone(),
                        source: e,
                    })?;
                    result.deleted.push(name);
                }
                FileClass::Foreign => result.kept_foreign.push(name),
                FileClass::Absent => {}
            }
        }
        Ok(result)
    }
}

/// Per-table mapped layers, rendered before any write so a failing table
/// produces no files at all.
struct TableRender {
    table: String,
    entity_name: String,
    internal_fields: Vec<FieldDescriptor>,
    do_fields: Vec<FieldDescriptor>,
    entity_fields: Vec<FieldDescriptor>,
}

/// Generates the three data-model layers plus the index scaffold per table.
pub struct DaoGenerator<'a> {
    tables: &'a IndexMap<String, Vec<ColumnDescriptor>>,
    config: &'a GantryConfig,
    /// Prefix stripped from table names before deriving type names.
    remove_prefix: &'a str,
    /// Go import path of the generated `internal` package.
    import_prefix: &'a str,
}

impl<'a> DaoGenerator<'a> {
    pub fn new(
        tables: &'a IndexMap<String, Vec<ColumnDescriptor>>,
        config: &'a GantryConfig,
        remove_prefix: &'a str,
        import_prefix: &'a str,
    ) -> Self {
        Self {
            tables,
            config,
            remove_prefix,
            import_prefix,
        }
    }

    fn entity_name(&self, table: &str) -> String {
        let stripped = table.strip_prefix(self.remove_prefix).unwrap_or(table);
        to_pascal_case(stripped)
    }

    fn render_table(
        &self,
        table: &str,
        columns: &[ColumnDescriptor],
    ) -> Result<TableRender, ItemFailure> {
        let mapper = TypeMapper::new(self.config);
        let map = |layer| {
            mapper.map_table(table, columns, layer).map_err(|e| ItemFailure {
                item: table.to_string(),
                error: Report::new(*e),
            })
        };
        Ok(TableRender {
            table: table.to_string(),
            entity_name: self.entity_name(table),
            internal_fields: map(Layer::DaoInternal)?,
            do_fields: map(Layer::DataObject)?,
            entity_fields: map(Layer::Entity)?,
        })
    }

    fn table_files<'r>(&self, render: &'r TableRender) -> [Box<dyn GeneratedFile + 'r>; 4]
    where
        'a: 'r,
    {
        [
            Box::new(DaoInternalGo::new(
                &render.table,
                &render.entity_name,
                &render.internal_fields,
            )),
            Box::new(DaoIndexGo::new(
                &render.table,
                &render.entity_name,
                self.import_prefix,
            )),
            Box::new(DoGo::new(
                &render.table,
                &render.entity_name,
                &render.do_fields,
            )),
            Box::new(EntityGo::new(
                &render.table,
                &render.entity_name,
                &render.entity_fields,
            )),
        ]
    }

    pub fn preview(&self) -> Preview {
        let mut preview = Preview::default();
        for (table, columns) in self.tables {
            let render = match self.render_table(table, columns) {
                Ok(render) => render,
                Err(failure) => {
                    preview.failures.push(failure);
                    continue;
                }
            };
            for file in self.table_files(&render) {
                preview.files.push(PreviewFile {
                    path: file.path(Path::new("")).display().to_string(),
                    content: file.render(),
                });
            }
        }
        preview
    }

    pub fn generate(&self, out: &Path) -> GenerateResult {
        let mut result = GenerateResult::default();
        for (table, columns) in self.tables {
            let render = match self.render_table(table, columns) {
                Ok(render) => render,
                Err(failure) => {
                    result.failures.push(failure);
                    continue;
                }
            };
            for file in self.table_files(&render) {
                let relative = file.path(Path::new("")).display().to_string();
                match file.write(out) {
                    Ok(outcome) => result.record(relative, outcome),
                    Err(error) => result.failures.push(ItemFailure {
                        item: table.clone(),
                        error: Report::new(error),
                    }),
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use gantry_core::SENTINEL;
    use gantry_resolve::ResolvedMethod;
    use gantry_source::{MethodSignature, Visibility};
    use tempfile::TempDir;

    use super::*;

    fn contract(name: &str, methods: &[&str]) -> ResolvedContract {
        ResolvedContract {
            type_name: name.to_string(),
            methods: methods
                .iter()
                .map(|m| ResolvedMethod {
                    signature: MethodSignature {
                        name: m.to_string(),
                        params: vec![],
                        results: vec!["error".to_string()],
                        visibility: Visibility::Exported,
                    },
                    source: name.to_string(),
                })
                .collect(),
        }
    }

    fn column(name: &str, native: &str, nullable: bool) -> ColumnDescriptor {
        ColumnDescriptor {
            name: name.to_string(),
            native_type: native.to_string(),
            nullable,
            comment: None,
            default_value: None,
        }
    }

    #[test]
    fn test_service_generate_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let contracts = vec![contract("User", &["Create"])];
        let generator = ServiceGenerator::new(&contracts, NameCase::Snake);

        let first = generator.generate(temp.path());
        assert_eq!(first.written, vec!["user.go"]);
        assert!(first.is_success());

        let second = generator.generate(temp.path());
        assert!(second.written.is_empty());
        assert_eq!(second.unchanged, vec!["user.go"]);
    }

    #[test]
    fn test_service_foreign_conflict_is_isolated() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("user.go"), "package service // mine\n").unwrap();

        let contracts = vec![contract("User", &["Create"]), contract("Order", &["Place"])];
        let generator = ServiceGenerator::new(&contracts, NameCase::Snake);
        let result = generator.generate(temp.path());

        assert_eq!(result.written, vec!["order.go"]);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].item, "User");
        // Foreign bytes untouched.
        assert_eq!(
            fs::read_to_string(temp.path().join("user.go")).unwrap(),
            "package service // mine\n"
        );
    }

    #[test]
    fn test_clear_deletes_only_machine_owned_orphans() {
        let temp = TempDir::new().unwrap();
        let contracts = vec![contract("User", &["Create"])];
        let generator = ServiceGenerator::new(&contracts, NameCase::Snake);
        generator.generate(temp.path());

        fs::write(
            temp.path().join("orphan.go"),
            format!("{}\npackage service\n", SENTINEL),
        )
        .unwrap();
        fs::write(temp.path().join("notes.go"), "package service\n").unwrap();

        let cleared = generator.clear(temp.path()).unwrap();
        assert_eq!(cleared.deleted, vec!["orphan.go"]);
        assert_eq!(cleared.kept_foreign, vec!["notes.go"]);
        assert!(!temp.path().join("orphan.go").exists());
        assert!(temp.path().join("notes.go").exists());
        assert!(temp.path().join("user.go").exists());
    }

    #[test]
    fn test_dao_generates_four_files_per_table() {
        let temp = TempDir::new().unwrap();
        let mut tables = IndexMap::new();
        tables.insert(
            "user".to_string(),
            vec![column("id", "INTEGER", false), column("age", "INT", true)],
        );
        let config = GantryConfig::default();
        let generator = DaoGenerator::new(&tables, &config, "", "app/dao/internal");

        let result = generator.generate(temp.path());
        assert!(result.is_success());
        assert_eq!(
            result.written,
            vec!["internal/user.go", "user.go", "do/user.go", "entity/user.go"]
        );

        let do_content = fs::read_to_string(temp.path().join("do/user.go")).unwrap();
        assert!(do_content.contains("Age *int"));
        let entity_content = fs::read_to_string(temp.path().join("entity/user.go")).unwrap();
        assert!(entity_content.contains("Age int"));
        assert!(!entity_content.contains("*int"));
    }

    #[test]
    fn test_dao_scaffold_survives_regeneration() {
        let temp = TempDir::new().unwrap();
        let mut tables = IndexMap::new();
        tables.insert("user".to_string(), vec![column("id", "INTEGER", false)]);
        let config = GantryConfig::default();
        let generator = DaoGenerator::new(&tables, &config, "", "app/dao/internal");

        generator.generate(temp.path());
        fs::write(temp.path().join("user.go"), "package dao // edited\n").unwrap();

        let second = generator.generate(temp.path());
        assert_eq!(second.skipped, vec!["user.go"]);
        assert_eq!(
            fs::read_to_string(temp.path().join("user.go")).unwrap(),
            "package dao // edited\n"
        );
    }

    #[test]
    fn test_dao_unmapped_table_is_isolated() {
        let temp = TempDir::new().unwrap();
        let mut tables = IndexMap::new();
        tables.insert(
            "place".to_string(),
            vec![column("location", "GEOMETRY", false)],
        );
        tables.insert("user".to_string(), vec![column("id", "INTEGER", false)]);
        let config = GantryConfig::default();
        let generator = DaoGenerator::new(&tables, &config, "", "app/dao/internal");

        let result = generator.generate(temp.path());
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].item, "place");
        // The bad table produced no files at all.
        assert!(!temp.path().join("internal/place.go").exists());
        assert!(temp.path().join("internal/user.go").exists());
    }

    #[test]
    fn test_dao_remove_prefix_shapes_type_names() {
        let mut tables = IndexMap::new();
        tables.insert(
            "gf_user".to_string(),
            vec![column("id", "INTEGER", false)],
        );
        let config = GantryConfig::default();
        let generator = DaoGenerator::new(&tables, &config, "gf_", "app/dao/internal");

        let preview = generator.preview();
        let paths: Vec<&str> = preview.files.iter().map(|f| f.path.as_str()).collect();
        insta::assert_snapshot!(paths.join("\n"), @r"
internal/user.go
user.go
do/user.go
entity/user.go
");
        assert!(preview.files[3].content.contains("type User struct {"));
        // Table name in generated content keeps its prefix.
        assert!(preview.files[0].content.contains("table:   \"gf_user\","));
    }
}
