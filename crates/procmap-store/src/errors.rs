//! Error handling for procmap-store
//!
//! Maps rusqlite failures onto the engine's error taxonomy so callers see
//! `Execution` / `Transaction` errors regardless of the backing driver.

use procmap_core::errors::MapError;

/// Result type alias using MapError
pub type Result<T> = std::result::Result<T, MapError>;

/// Execution error for `statement` from a rusqlite::Error
pub fn from_rusqlite(statement: &str, err: rusqlite::Error) -> MapError {
    MapError::execution(statement, err.to_string())
}

/// Transaction error for `action` (begin/commit/rollback) from a rusqlite::Error
pub fn tx_error(action: &str, err: rusqlite::Error) -> MapError {
    MapError::transaction(action, err.to_string())
}

/// The call names a procedure the catalog does not define
pub fn unknown_procedure(statement: &str, procedure: &str) -> MapError {
    MapError::execution(statement, format!("procedure {} is not defined", procedure))
}

/// Argument count disagrees with the statement
pub fn arity_mismatch(statement: &str, expected: usize, actual: usize) -> MapError {
    MapError::execution(
        statement,
        format!("expected {} arguments, got {}", expected, actual),
    )
}

/// The connection mutex was poisoned by a panicking holder
pub fn lock_poisoned(statement: &str) -> MapError {
    MapError::execution(statement, "connection lock poisoned")
}
