//! Core types shared across procmap facilities
//!
//! This crate provides the canonical schema constants used by both the
//! error facility and the logging facility, so that every crate in the
//! workspace emits the same structured keys.

pub mod schema;
