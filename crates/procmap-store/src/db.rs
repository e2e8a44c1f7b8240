//! Database connection management
//!
//! Opening and configuring raw rusqlite connections. `SqliteConnection` wraps
//! these; use them directly only for fixtures.

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path).map_err(|e| from_rusqlite("open", e))?;
    configure(&conn)?;
    Ok(conn)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(|e| from_rusqlite("open", e))?;
    configure(&conn)?;
    Ok(conn)
}

/// Configure a connection with the settings procmap expects
pub fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", true)
        .map_err(|e| from_rusqlite("PRAGMA foreign_keys", e))?;

    // journal_mode answers with the mode in effect; in-memory databases stay "memory"
    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(|e| from_rusqlite("PRAGMA journal_mode", e))?;
    tracing::debug!(journal_mode = %mode, "configured sqlite connection");

    conn.busy_timeout(Duration::from_secs(5))
        .map_err(|e| from_rusqlite("busy_timeout", e))?;

    Ok(())
}
