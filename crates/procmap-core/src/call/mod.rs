//! Per-call stages: statement text, parameter binding, row materialization

pub mod binder;
pub mod materializer;
pub mod statement;

pub use binder::bind;
pub use materializer::{materialize, scan_row};
pub use statement::{build_call, parse_call, CallText};
