//! procmap Engine - repository façade
//!
//! Orchestrates field-order resolution, call building, binding and row
//! materialization against a [`Connection`](procmap_core::Connection).
//!
//! ```
//! use procmap_core::descriptor::RecordDescriptor;
//! use procmap_core::shape::NoOutput;
//! use procmap_engine::Repository;
//! use procmap_store::{ProcedureCatalog, SqliteConnection};
//!
//! procmap_core::record_shape! {
//!     #[derive(Debug, Default)]
//!     pub struct CreateUser {
//!         #[order = "1"]
//!         pub name: String,
//!     }
//! }
//!
//! impl RecordDescriptor for CreateUser {
//!     type Output = NoOutput;
//!     fn input_shape_name(&self) -> &str { "CreateUser" }
//!     fn procedure_name(&self) -> &str { "create_user" }
//!     fn output_shape_name(&self) -> &str { "NoOutput" }
//!     fn new_empty_output(&self) -> NoOutput { NoOutput }
//! }
//!
//! let conn = SqliteConnection::open_in_memory()?.with_catalog(
//!     ProcedureCatalog::new().define("create_user", "INSERT INTO users (name) VALUES (?1)"),
//! );
//! conn.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)")?;
//!
//! let repo = Repository::new(conn);
//! repo.insert(&CreateUser { name: "Ada".to_string() })?;
//! # Ok::<(), procmap_core::MapError>(())
//! ```
//!
//! ## Batch inserts
//!
//! Under the default [`BatchFailurePolicy::ContinueAndCommit`],
//! [`Repository::batch_insert`] keeps going past failing rows and commits the
//! rows that succeeded, returning `Ok(())` even when some rows were lost.
//! Callers that need to know use [`Repository::batch_insert_with_outcome`] or
//! switch to [`BatchFailurePolicy::RollbackOnFailure`].

pub mod config;
pub mod repository;

pub use config::{BatchFailurePolicy, RepositoryConfig};
pub use repository::{BatchFailure, BatchOutcome, Repository};
