//! SQLite access.
//!
//! Every operation opens its own [`Connection`]; nothing is pooled or shared
//! between requests, so each load or batch insert owns its transaction.

use crate::error::ServiceResult;
use crate::ingestion::schema::SchemaRegistry;
use log::info;
use rusqlite::{Connection, OpenFlags};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Database { path: path.into() }
    }

    pub fn connect(&self) -> ServiceResult<Connection> {
        let conn = Connection::open(&self.path)?;
        Ok(conn)
    }

    /// Round-trip `SELECT 1` without creating the database file.
    pub fn ping(&self) -> ServiceResult<()> {
        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_WRITE)?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    /// Create any declared table that does not exist yet.
    pub fn ensure_tables(&self, registry: &SchemaRegistry) -> ServiceResult<()> {
        let conn = self.connect()?;
        for schema in registry.iter() {
            conn.execute(&schema.create_table_sql(), [])?;
            info!("Table '{}' ready", schema.table());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ping_after_bootstrap() {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("ingest.sqlite"));
        db.ensure_tables(&SchemaRegistry::load().unwrap()).unwrap();
        db.ping().unwrap();

        let conn = db.connect().unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('departments', 'jobs', 'employees')",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(tables, 3);
    }

    #[test]
    fn ensure_tables_is_repeatable() {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("ingest.sqlite"));
        let registry = SchemaRegistry::load().unwrap();
        db.ensure_tables(&registry).unwrap();
        db.ensure_tables(&registry).unwrap();
    }

    #[test]
    fn ping_unreachable_database_fails() {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("missing").join("ingest.sqlite"));
        assert!(db.ping().is_err());
        // ping must not create the file either
        let db = Database::new(dir.path().join("never-created.sqlite"));
        assert!(db.ping().is_err());
        assert!(!dir.path().join("never-created.sqlite").exists());
    }
}
