//! Field-order resolution and caching
//!
//! Provides:
//! - The resolved, validated field sequence of a shape
//! - The resolver that derives it from declared order markers
//! - A concurrency-safe cache so each shape is resolved once

pub mod cache;
pub mod resolver;
pub mod sequence;

pub use cache::FieldOrderCache;
pub use resolver::resolve;
pub use sequence::FieldSequence;
