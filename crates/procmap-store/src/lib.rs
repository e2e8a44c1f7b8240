//! procmap Store - SQLite connection collaborator
//!
//! Provides:
//! - `SqliteConnection`, a thread-safe `procmap_core::Connection` over rusqlite
//! - A procedure catalog standing in for stored procedures, which SQLite lacks
//! - Open/configure helpers and rusqlite error mapping

pub mod catalog;
pub mod connection;
pub mod db;
pub mod errors;

mod values;

// Re-export key types
pub use catalog::ProcedureCatalog;
pub use connection::{SqliteConnection, SqliteTransaction};
pub use errors::Result;
