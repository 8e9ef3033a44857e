use super::filter::Filter;
use super::query::{QueryBuilder, SqlQuery};
use super::value::{Row, Value};
use crate::error::{AsterError, Result};
use rusqlite::config::DbConfig;
use rusqlite::{params_from_iter, Connection};
use std::path::{Path, PathBuf};

/// Schema-agnostic CRUD over one SQLite database.
///
/// Holds a single connection for its lifetime. Every mutating call autocommits
/// on its own; there is no multi-statement transaction. `Connection` is not
/// `Sync`, so callers sharing a store across threads must serialize access.
pub struct DataStore {
    conn: Option<Connection>,
    path: PathBuf,
}

impl DataStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.to_string_lossy().trim().is_empty() {
            return Err(AsterError::config("Please provide a database path"));
        }
        let conn = strict(Connection::open(path)?)?;
        tracing::debug!("Opened database at {}", path.display());
        Ok(Self {
            conn: Some(conn),
            path: path.to_path_buf(),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = strict(Connection::open_in_memory()?)?;
        Ok(Self {
            conn: Some(conn),
            path: PathBuf::from(":memory:"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| {
                AsterError::State(format!("data store {} is closed", self.path.display()))
            })
    }

    fn execute(&self, query: &SqlQuery) -> Result<usize> {
        let conn = self.conn()?;
        tracing::debug!(sql = %query.sql, params = query.params.len(), "execute");
        Ok(conn.execute(&query.sql, params_from_iter(query.params.iter()))?)
    }

    /// Create `table` if it does not already exist. An existing table with a
    /// different schema is left as is.
    pub fn create_table<K, D>(
        &self,
        table: &str,
        columns: impl IntoIterator<Item = (K, D)>,
    ) -> Result<()>
    where
        K: AsRef<str>,
        D: AsRef<str>,
    {
        let query = QueryBuilder::create_table(table, columns)?;
        self.execute(&query)?;
        Ok(())
    }

    pub fn drop_table(&self, table: &str) -> Result<()> {
        let query = QueryBuilder::drop_table(table)?;
        self.execute(&query)?;
        Ok(())
    }

    /// Insert one row and return its rowid.
    pub fn insert(&self, table: &str, row: &Row) -> Result<i64> {
        let query = QueryBuilder::insert(table, row)?;
        self.execute(&query)?;
        Ok(self.conn()?.last_insert_rowid())
    }

    /// Select rows, optionally projecting `columns` and filtering with `filter`.
    /// Column order in each returned row follows the result set.
    pub fn select(
        &self,
        table: &str,
        columns: Option<&[&str]>,
        filter: Option<&Filter>,
    ) -> Result<Vec<Row>> {
        let query = QueryBuilder::select(table, columns, filter)?;
        let conn = self.conn()?;
        tracing::debug!(sql = %query.sql, params = query.params.len(), "select");

        let mut stmt = conn.prepare(&query.sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let rows = stmt.query_map(params_from_iter(query.params.iter()), |r| {
            let mut row = Row::new();
            for (i, name) in names.iter().enumerate() {
                row.set(name.as_str(), Value::from(r.get_ref(i)?));
            }
            Ok(row)
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Update matching rows; returns the number of rows changed.
    pub fn update(&self, table: &str, row: &Row, filter: &Filter) -> Result<usize> {
        let query = QueryBuilder::update(table, row, filter)?;
        self.execute(&query)
    }

    /// Delete matching rows; returns the number of rows removed.
    pub fn delete(&self, table: &str, filter: &Filter) -> Result<usize> {
        let query = QueryBuilder::delete(table, filter)?;
        self.execute(&query)
    }

    /// Release the connection. Any later call on this store is a `State` error.
    pub fn close(&mut self) -> Result<()> {
        let conn = self.conn.take().ok_or_else(|| {
            AsterError::State(format!(
                "data store {} is already closed",
                self.path.display()
            ))
        })?;
        match conn.close() {
            Ok(()) => {
                tracing::debug!("Closed database at {}", self.path.display());
                Ok(())
            }
            Err((conn, e)) => {
                self.conn = Some(conn);
                Err(e.into())
            }
        }
    }
}

/// Turn off SQLite's double-quoted string fallback so a quoted identifier that
/// names no column is an error instead of a string literal.
fn strict(conn: Connection) -> Result<Connection> {
    conn.set_db_config(DbConfig::SQLITE_DBCONFIG_DQS_DML, false)?;
    conn.set_db_config(DbConfig::SQLITE_DBCONFIG_DQS_DDL, false)?;
    Ok(conn)
}

impl std::fmt::Debug for DataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStore")
            .field("path", &self.path)
            .field("open", &self.is_open())
            .finish()
    }
}
