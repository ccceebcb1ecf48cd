//! SQLite schema introspection.

use std::{path::Path, time::Duration};

use indexmap::IndexMap;
use rusqlite::{Connection, OpenFlags};

use crate::{column::ColumnDescriptor, error::SchemaError};

/// Bounded wait on a locked database; introspection never blocks forever.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Table selection for a generation run.
#[derive(Debug, Clone, Default)]
pub struct TableFilter {
    /// Explicit allow list; empty means every user table.
    pub tables: Vec<String>,
    /// Tables to exclude after selection.
    pub tables_ex: Vec<String>,
}

impl TableFilter {
    pub fn is_explicit(&self) -> bool {
        !self.tables.is_empty()
    }
}

/// Read-only introspector over a SQLite database file.
#[derive(Debug)]
pub struct SqliteIntrospector {
    conn: Connection,
}

impl SqliteIntrospector {
    /// Open the database read-only with a bounded busy timeout.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Box<SchemaError>> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| SchemaError::access(format!("cannot open '{}'", path.display()), e))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| SchemaError::access("cannot set busy timeout", e))?;
        Ok(Self { conn })
    }

    /// List user tables in name order.
    pub fn tables(&self) -> Result<Vec<String>, Box<SchemaError>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )
            .map_err(|e| SchemaError::access("cannot list tables", e))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .and_then(Iterator::collect)
            .map_err(|e| SchemaError::access("cannot list tables", e))?;
        Ok(names)
    }

    /// Column descriptors for one table, in ordinal (`cid`) order.
    pub fn columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>, Box<SchemaError>> {
        // PRAGMA arguments cannot be bound; quote the identifier instead.
        let sql = format!(
            "SELECT name, type, \"notnull\", dflt_value FROM pragma_table_info('{}') ORDER BY cid",
            table.replace('\'', "''")
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| SchemaError::access(format!("cannot read columns of '{}'", table), e))?;
        let columns = stmt
            .query_map([], |row| {
                Ok(ColumnDescriptor {
                    name: row.get(0)?,
                    native_type: row.get(1)?,
                    nullable: row.get::<_, i64>(2)? == 0,
                    // SQLite carries no column comments.
                    comment: None,
                    default_value: row.get::<_, Option<String>>(3)?,
                })
            })
            .and_then(Iterator::collect::<Result<Vec<_>, _>>)
            .map_err(|e| SchemaError::access(format!("cannot read columns of '{}'", table), e))?;
        Ok(columns)
    }

    /// Introspect the selected tables, keyed by table name.
    ///
    /// An explicit filter naming a missing table is fatal for the run, not
    /// a partial success.
    pub fn introspect(
        &self,
        filter: &TableFilter,
    ) -> Result<IndexMap<String, Vec<ColumnDescriptor>>, Box<SchemaError>> {
        let existing = self.tables()?;

        let selected: Vec<String> = if filter.is_explicit() {
            for requested in &filter.tables {
                if !existing.contains(requested) {
                    return Err(Box::new(SchemaError::TableNotFound {
                        table: requested.clone(),
                    }));
                }
            }
            filter.tables.clone()
        } else {
            existing
        };

        let mut result = IndexMap::new();
        for table in selected {
            if filter.tables_ex.contains(&table) {
                continue;
            }
            let columns = self.columns(&table)?;
            result.insert(table, columns);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn fixture_db(temp: &TempDir) -> std::path::PathBuf {
        let path = temp.path().join("test.sqlite");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE user (
                id INTEGER NOT NULL PRIMARY KEY,
                name VARCHAR(64) NOT NULL,
                age INT,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE order_item (
                id INTEGER NOT NULL PRIMARY KEY,
                note TEXT
            );",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_tables_listed_in_name_order() {
        let temp = TempDir::new().unwrap();
        let db = fixture_db(&temp);
        let intro = SqliteIntrospector::open(&db).unwrap();
        assert_eq!(intro.tables().unwrap(), vec!["order_item", "user"]);
    }

    #[test]
    fn test_columns_preserve_ordinal_order() {
        let temp = TempDir::new().unwrap();
        let db = fixture_db(&temp);
        let intro = SqliteIntrospector::open(&db).unwrap();
        let columns = intro.columns("user").unwrap();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "age", "created_at"]);

        assert!(!columns[0].nullable);
        assert!(columns[2].nullable);
        assert_eq!(columns[1].native_type, "VARCHAR(64)");
        assert_eq!(
            columns[3].default_value.as_deref(),
            Some("CURRENT_TIMESTAMP")
        );
    }

    #[test]
    fn test_explicit_filter_missing_table_is_fatal() {
        let temp = TempDir::new().unwrap();
        let db = fixture_db(&temp);
        let intro = SqliteIntrospector::open(&db).unwrap();
        let filter = TableFilter {
            tables: vec!["missing".to_string()],
            ..Default::default()
        };
        let err = intro.introspect(&filter).unwrap_err();
        assert!(matches!(*err, SchemaError::TableNotFound { .. }));
    }

    #[test]
    fn test_exclusion_filter() {
        let temp = TempDir::new().unwrap();
        let db = fixture_db(&temp);
        let intro = SqliteIntrospector::open(&db).unwrap();
        let filter = TableFilter {
            tables_ex: vec!["order_item".to_string()],
            ..Default::default()
        };
        let tables = intro.introspect(&filter).unwrap();
        assert_eq!(tables.keys().collect::<Vec<_>>(), vec!["user"]);
    }

    #[test]
    fn test_open_missing_db_is_access_error() {
        let temp = TempDir::new().unwrap();
        let err = SqliteIntrospector::open(temp.path().join("absent.sqlite")).unwrap_err();
        assert!(matches!(*err, SchemaError::Access { .. }));
    }
}
