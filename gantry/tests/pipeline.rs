//! End-to-end pipeline tests: extract/introspect, resolve, generate.

use std::fs;

use gantry_codegen::{DaoGenerator, ServiceGenerator};
use gantry_core::{GantryConfig, NameCase, SENTINEL};
use gantry_resolve::{ResolveError, resolve};
use gantry_schema::{SqliteIntrospector, TableFilter};
use gantry_source::Extractor;
use indexmap::IndexMap;
use tempfile::TempDir;

fn write_src(dir: &std::path::Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_service_pipeline_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("logic");
    let dst = temp.path().join("service");
    write_src(
        &src,
        "user/user.go",
        r#"package user

type sUser struct{}

func (s *sUser) Create(ctx context.Context, name string) (int64, error) {
	return 0, nil
}
"#,
    );
    write_src(
        &src,
        "admin/admin.go",
        r#"package admin

type sAdmin struct {
	sUser `gen:"extend"`
}

func (s *sAdmin) Ban(ctx context.Context, id int64) error {
	return nil
}
"#,
    );

    let symbols = Extractor::new(&src).extract(None).unwrap();
    let outcome = resolve(&symbols).unwrap();
    let generator = ServiceGenerator::new(&outcome.contracts, NameCase::Snake);

    let first = generator.generate(&dst);
    assert!(first.is_success());
    let mut written = first.written.clone();
    written.sort();
    assert_eq!(written, vec!["admin.go", "user.go"]);

    let admin = fs::read_to_string(dst.join("admin.go")).unwrap();
    assert!(admin.starts_with(SENTINEL));
    // Promoted method from the extended type, after the direct one.
    assert!(admin.contains("Ban(ctx context.Context, id int64) error"));
    assert!(admin.contains("Create(ctx context.Context, name string) (int64, error)"));

    let before = fs::read(dst.join("admin.go")).unwrap();
    let second = generator.generate(&dst);
    assert!(second.written.is_empty());
    assert_eq!(second.unchanged.len(), 2);
    assert_eq!(fs::read(dst.join("admin.go")).unwrap(), before);
}

#[test]
fn test_composition_cycle_produces_no_output() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("logic");
    let dst = temp.path().join("service");
    write_src(
        &src,
        "cycle.go",
        r#"package cycle

type sA struct {
	sB `gen:"extend"`
}

type sB struct {
	sA `gen:"extend"`
}
"#,
    );

    let symbols = Extractor::new(&src).extract(None).unwrap();
    let err = resolve(&symbols).unwrap_err();
    assert!(matches!(*err, ResolveError::CompositionCycle { .. }));
    assert!(!dst.exists());
}

#[test]
fn test_dao_pipeline_end_to_end() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("app.sqlite");
    let out = temp.path().join("dao");

    let conn = rusqlite::Connection::open(&db).unwrap();
    conn.execute_batch(
        "CREATE TABLE user (
            id INTEGER NOT NULL PRIMARY KEY,
            nickname VARCHAR(64) NOT NULL,
            age INT,
            created_at DATETIME NOT NULL
        );",
    )
    .unwrap();
    drop(conn);

    let introspector = SqliteIntrospector::open(&db).unwrap();
    let tables = introspector.introspect(&TableFilter::default()).unwrap();
    let config = GantryConfig::default();
    let generator = DaoGenerator::new(&tables, &config, "", "app/internal/dao/internal");

    let first = generator.generate(&out);
    assert!(first.is_success());
    assert_eq!(first.written.len(), 4);

    let do_file = fs::read_to_string(out.join("do/user.go")).unwrap();
    assert!(do_file.contains("Age       *int"));
    assert!(do_file.contains("CreatedAt time.Time"));
    let entity_file = fs::read_to_string(out.join("entity/user.go")).unwrap();
    assert!(entity_file.contains("Age       int "));

    // Scaffold is hand-editable from the start.
    let index = fs::read_to_string(out.join("user.go")).unwrap();
    assert!(!index.starts_with(SENTINEL));
    assert!(index.contains("User = userDao{internal.NewUserDao()}"));

    fs::write(out.join("user.go"), "package dao // customized\n").unwrap();
    let second = generator.generate(&out);
    assert!(second.is_success());
    assert_eq!(second.unchanged.len(), 3);
    assert_eq!(second.skipped, vec!["user.go"]);
    assert_eq!(
        fs::read_to_string(out.join("user.go")).unwrap(),
        "package dao // customized\n"
    );
}

#[test]
fn test_field_override_flows_through_generation() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("app.sqlite");
    let out = temp.path().join("dao");

    let conn = rusqlite::Connection::open(&db).unwrap();
    conn.execute_batch(
        "CREATE TABLE account (
            id INTEGER NOT NULL PRIMARY KEY,
            balance DECIMAL(10,2) NOT NULL
        );",
    )
    .unwrap();
    drop(conn);

    let config: GantryConfig = r#"
        [field_mapping."account.balance"]
        type = "big.Float"
        import = "math/big"
    "#
    .parse()
    .unwrap();

    let introspector = SqliteIntrospector::open(&db).unwrap();
    let tables = introspector.introspect(&TableFilter::default()).unwrap();
    let generator = DaoGenerator::new(&tables, &config, "", "app/internal/dao/internal");

    let result = generator.generate(&out);
    assert!(result.is_success());
    let entity_file = fs::read_to_string(out.join("entity/account.go")).unwrap();
    assert!(entity_file.contains("\"math/big\""));
    assert!(entity_file.contains("Balance big.Float"));
}
