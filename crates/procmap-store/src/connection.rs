//! SQLite connection collaborator
//!
//! `CALL name(?,...)` text is dispatched through the [`ProcedureCatalog`];
//! any other text runs verbatim. Access to the underlying rusqlite connection
//! is serialized by a mutex, and an open transaction holds that mutex until it
//! commits, rolls back or is dropped.

use crate::catalog::ProcedureCatalog;
use crate::errors::{
    arity_mismatch, from_rusqlite, lock_poisoned, tx_error, unknown_procedure, Result,
};
use crate::values::{from_value_ref, SqlArg};
use procmap_core::call::parse_call;
use procmap_core::connection::{Connection, ExecOutcome, ResultSet, Row, Transaction};
use procmap_core::errors::MapError;
use procmap_core::value::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

/// Thread-safe SQLite connection with an emulated procedure catalog
pub struct SqliteConnection {
    conn: Mutex<rusqlite::Connection>,
    catalog: RwLock<ProcedureCatalog>,
}

impl SqliteConnection {
    /// Open (creating if needed) the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_connection(crate::db::open(path)?))
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_connection(crate::db::open_in_memory()?))
    }

    /// Wrap an already configured rusqlite connection
    pub fn from_connection(conn: rusqlite::Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            catalog: RwLock::new(ProcedureCatalog::new()),
        }
    }

    /// Replace the procedure catalog
    pub fn with_catalog(self, catalog: ProcedureCatalog) -> Self {
        Self {
            conn: self.conn,
            catalog: RwLock::new(catalog),
        }
    }

    /// Define (or redefine) one procedure
    pub fn define_procedure(&self, name: &str, sql: &str) {
        self.catalog
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, sql);
    }

    /// Check that the database answers
    pub fn ping(&self) -> Result<()> {
        let conn = self.lock("SELECT 1")?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|e| from_rusqlite("SELECT 1", e))?;
        Ok(())
    }

    /// Run one or more `;`-separated statements without parameters
    ///
    /// Intended for schema setup in fixtures.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        let conn = self.lock(sql)?;
        conn.execute_batch(sql).map_err(|e| from_rusqlite(sql, e))
    }

    /// Delete every row of `table`, resetting its AUTOINCREMENT counter
    pub fn truncate(&self, table: &str) -> Result<()> {
        let statement = format!("DELETE FROM {}", table);
        if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(MapError::execution(
                statement,
                format!("invalid table name {:?}", table),
            ));
        }

        let conn = self.lock(&statement)?;
        conn.execute(&statement, [])
            .map_err(|e| from_rusqlite(&statement, e))?;

        let has_sequence: bool = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'sqlite_sequence'",
                [],
                |row| row.get::<_, i64>(0),
            )
            .map(|n| n > 0)
            .map_err(|e| from_rusqlite("sqlite_sequence lookup", e))?;
        if has_sequence {
            conn.execute("DELETE FROM sqlite_sequence WHERE name = ?1", [table])
                .map_err(|e| from_rusqlite("sqlite_sequence reset", e))?;
        }
        Ok(())
    }

    fn lock(&self, statement: &str) -> Result<MutexGuard<'_, rusqlite::Connection>> {
        self.conn.lock().map_err(|_| lock_poisoned(statement))
    }

    fn sql_for(&self, text: &str, args: &[Value]) -> Result<String> {
        let catalog = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
        sql_for(&catalog, text, args)
    }
}

impl Connection for SqliteConnection {
    fn query(&self, text: &str, args: &[Value]) -> Result<ResultSet> {
        let sql = self.sql_for(text, args)?;
        let conn = self.lock(text)?;
        run_query(&conn, text, &sql, args)
    }

    fn exec(&self, text: &str, args: &[Value]) -> Result<ExecOutcome> {
        let sql = self.sql_for(text, args)?;
        let conn = self.lock(text)?;
        run_exec(&conn, text, &sql, args)
    }

    fn begin(&self) -> Result<Box<dyn Transaction + '_>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| MapError::transaction("begin", "connection lock poisoned"))?;
        conn.execute_batch("BEGIN").map_err(|e| tx_error("begin", e))?;
        tracing::debug!("sqlite transaction opened");
        Ok(Box::new(SqliteTransaction {
            conn,
            catalog: &self.catalog,
            open: true,
        }))
    }
}

/// Transaction on a [`SqliteConnection`]
///
/// Holds the connection lock for its whole lifetime. Rolls back on drop unless
/// committed or rolled back explicitly.
pub struct SqliteTransaction<'a> {
    conn: MutexGuard<'a, rusqlite::Connection>,
    catalog: &'a RwLock<ProcedureCatalog>,
    open: bool,
}

impl SqliteTransaction<'_> {
    fn finish(&mut self, action: &str) -> Result<()> {
        let sql = if action == "commit" { "COMMIT" } else { "ROLLBACK" };
        self.conn
            .execute_batch(sql)
            .map_err(|e| tx_error(action, e))?;
        self.open = false;
        tracing::debug!(action, "sqlite transaction closed");
        Ok(())
    }
}

impl Transaction for SqliteTransaction<'_> {
    fn exec(&mut self, text: &str, args: &[Value]) -> Result<ExecOutcome> {
        let sql = {
            let catalog = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
            sql_for(&catalog, text, args)?
        };
        run_exec(&self.conn, text, &sql, args)
    }

    fn commit(mut self: Box<Self>) -> Result<()> {
        self.finish("commit")
    }

    fn rollback(mut self: Box<Self>) -> Result<()> {
        self.finish("rollback")
    }
}

impl Drop for SqliteTransaction<'_> {
    fn drop(&mut self) {
        if self.open {
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                tracing::warn!(error = %e, "rollback of abandoned transaction failed");
            }
        }
    }
}

/// SQL to run for `text`: the catalog body for call text, `text` itself otherwise
fn sql_for(catalog: &ProcedureCatalog, text: &str, args: &[Value]) -> Result<String> {
    let Some(call) = parse_call(text) else {
        return Ok(text.to_string());
    };
    if call.placeholder_count != args.len() {
        return Err(arity_mismatch(text, call.placeholder_count, args.len()));
    }
    catalog
        .get(call.procedure)
        .map(str::to_string)
        .ok_or_else(|| unknown_procedure(text, call.procedure))
}

fn prepare<'c>(
    conn: &'c rusqlite::Connection,
    text: &str,
    sql: &str,
    args: &[Value],
) -> Result<rusqlite::Statement<'c>> {
    let stmt = conn.prepare(sql).map_err(|e| from_rusqlite(text, e))?;
    if stmt.parameter_count() != args.len() {
        return Err(arity_mismatch(text, stmt.parameter_count(), args.len()));
    }
    Ok(stmt)
}

fn run_query(
    conn: &rusqlite::Connection,
    text: &str,
    sql: &str,
    args: &[Value],
) -> Result<ResultSet> {
    let mut stmt = prepare(conn, text, sql, args)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let column_count = columns.len();

    let mut rows = stmt
        .query(rusqlite::params_from_iter(args.iter().map(SqlArg)))
        .map_err(|e| from_rusqlite(text, e))?;

    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(|e| from_rusqlite(text, e))? {
        let mut values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            let value = row.get_ref(i).map_err(|e| from_rusqlite(text, e))?;
            values.push(from_value_ref(value));
        }
        out.push(Row::new(values));
    }

    tracing::debug!(statement = text, row_count = out.len(), "sqlite query");
    Ok(ResultSet::new(columns, out))
}

fn run_exec(
    conn: &rusqlite::Connection,
    text: &str,
    sql: &str,
    args: &[Value],
) -> Result<ExecOutcome> {
    let mut stmt = prepare(conn, text, sql, args)?;
    let params = rusqlite::params_from_iter(args.iter().map(SqlArg));

    let rows_affected = if stmt.column_count() == 0 {
        stmt.execute(params).map_err(|e| from_rusqlite(text, e))? as u64
    } else {
        // Row-producing body (e.g. INSERT ... RETURNING): drain and count
        let mut rows = stmt.query(params).map_err(|e| from_rusqlite(text, e))?;
        let mut drained = 0u64;
        while rows.next().map_err(|e| from_rusqlite(text, e))?.is_some() {
            drained += 1;
        }
        drained
    };

    let outcome = ExecOutcome {
        rows_affected,
        last_insert_id: conn.last_insert_rowid(),
    };
    tracing::debug!(statement = text, rows_affected, "sqlite exec");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> SqliteConnection {
        let conn = SqliteConnection::open_in_memory().unwrap().with_catalog(
            ProcedureCatalog::new()
                .define("create_user", "INSERT INTO users (name) VALUES (?1)")
                .define("list_users", "SELECT id, name FROM users ORDER BY id"),
        );
        conn.execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL)",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_call_dispatches_through_catalog() {
        let conn = users();
        let outcome = conn
            .exec("CALL create_user(?)", &[Value::Text("ada".to_string())])
            .unwrap();
        assert_eq!(outcome.rows_affected, 1);
        assert_eq!(outcome.last_insert_id, 1);

        let result = conn.query("CALL list_users()", &[]).unwrap();
        assert_eq!(result.columns, vec!["id".to_string(), "name".to_string()]);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].get(1), Some(&Value::Text("ada".to_string())));
    }

    #[test]
    fn test_unknown_procedure_is_execution_error() {
        let conn = users();
        let err = conn.exec("CALL drop_everything()", &[]).unwrap_err();
        assert!(matches!(
            err,
            MapError::Execution { ref message, .. } if message.contains("drop_everything")
        ));
    }

    #[test]
    fn test_argument_count_must_match_placeholders() {
        let conn = users();
        let err = conn.exec("CALL create_user(?)", &[]).unwrap_err();
        assert!(matches!(err, MapError::Execution { .. }));
    }

    #[test]
    fn test_dropped_transaction_rolls_back() {
        let conn = users();
        {
            let mut tx = conn.begin().unwrap();
            tx.exec("CALL create_user(?)", &[Value::Text("ghost".to_string())])
                .unwrap();
        }
        assert!(conn.query("CALL list_users()", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_truncate_resets_autoincrement() {
        let conn = users();
        conn.exec("CALL create_user(?)", &[Value::Text("a".to_string())])
            .unwrap();
        conn.truncate("users").unwrap();
        let outcome = conn
            .exec("CALL create_user(?)", &[Value::Text("b".to_string())])
            .unwrap();
        assert_eq!(outcome.last_insert_id, 1);
    }

    #[test]
    fn test_truncate_rejects_odd_table_names() {
        let conn = users();
        assert!(conn.truncate("users; DROP TABLE users").is_err());
    }

    #[test]
    fn test_ping() {
        users().ping().unwrap();
    }
}
