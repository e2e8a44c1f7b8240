//! Procedure catalog
//!
//! SQLite has no stored procedures. The catalog maps a procedure name to one
//! SQL statement with positional parameters (`?` or `?NNN`), and call text
//! naming that procedure runs the statement with the call's arguments.

use std::collections::HashMap;

/// Procedure name → SQL statement
#[derive(Debug, Clone, Default)]
pub struct ProcedureCatalog {
    procedures: HashMap<String, String>,
}

impl ProcedureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) `name`
    ///
    /// ```
    /// use procmap_store::ProcedureCatalog;
    ///
    /// let catalog = ProcedureCatalog::new()
    ///     .define("create_user", "INSERT INTO users (name, email) VALUES (?1, ?2)")
    ///     .define("list_users", "SELECT id, name, email FROM users ORDER BY id");
    /// assert!(catalog.contains("create_user"));
    /// ```
    pub fn define(mut self, name: impl Into<String>, sql: impl Into<String>) -> Self {
        self.insert(name, sql);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, sql: impl Into<String>) {
        self.procedures.insert(name.into(), sql.into());
    }

    /// SQL body of `name`; procedure names are case-insensitive like MySQL's
    pub fn get(&self, name: &str) -> Option<&str> {
        self.procedures
            .get(name)
            .or_else(|| {
                self.procedures
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            })
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}
