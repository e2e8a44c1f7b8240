//! procmap core - stored-procedure mapping engine
//!
//! This crate provides the pieces the repository façade orchestrates:
//! - Shape metadata with declarative `#[order = "N"]` markers (`record_shape!`)
//! - Field-order resolution with duplicate/gap/start validation
//! - A concurrency-safe cache of resolved field orders
//! - Call text construction, positional parameter binding, row materialization
//! - The connection collaborator traits the engine talks to
//! - Error and logging facilities shared by every procmap crate

pub mod call;
pub mod connection;
pub mod descriptor;
pub mod errors;
pub mod logging_facility;
pub mod mapping;
pub mod shape;
pub mod value;

pub use procmap_core_types::schema;

// Re-export commonly used types
pub use connection::{Connection, ExecOutcome, ResultSet, Row, Transaction};
pub use descriptor::RecordDescriptor;
pub use errors::{ExError, ExErrorKind, MapError, Result};
pub use mapping::{FieldOrderCache, FieldSequence};
pub use shape::{FieldDef, FieldError, NoOutput, Shape};
pub use value::{FieldValue, Value, ValueError};
