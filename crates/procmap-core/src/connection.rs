//! Connection collaborator interface
//!
//! The engine never opens, pools or health-checks connections. Whatever owns
//! the database hands the engine something implementing [`Connection`].

use crate::errors::Result;
use crate::value::Value;

/// One result row, columns in select order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

/// Rows produced by a query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Name of column `index`, if the collaborator reported one
    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(String::as_str)
    }
}

/// Outcome of a statement that does not produce rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    pub rows_affected: u64,
    pub last_insert_id: i64,
}

/// A database handle the engine can run call text against
///
/// Implementations must be safe to share between threads; any locking or
/// pooling is theirs.
pub trait Connection: Send + Sync {
    /// Run row-producing call text
    ///
    /// # Errors
    ///
    /// `Execution` for any driver or connection failure.
    fn query(&self, text: &str, args: &[Value]) -> Result<ResultSet>;

    /// Run call text, discarding any rows
    ///
    /// # Errors
    ///
    /// `Execution` for any driver or connection failure.
    fn exec(&self, text: &str, args: &[Value]) -> Result<ExecOutcome>;

    /// Open a transactional scope
    ///
    /// # Errors
    ///
    /// `Transaction` if the scope cannot be opened.
    fn begin(&self) -> Result<Box<dyn Transaction + '_>>;
}

/// A transactional scope opened by [`Connection::begin`]
///
/// Dropping a transaction without committing or rolling back rolls it back.
pub trait Transaction {
    /// # Errors
    ///
    /// `Execution` for any driver failure.
    fn exec(&mut self, text: &str, args: &[Value]) -> Result<ExecOutcome>;

    /// # Errors
    ///
    /// `Transaction` if the commit fails.
    fn commit(self: Box<Self>) -> Result<()>;

    /// # Errors
    ///
    /// `Transaction` if the rollback fails.
    fn rollback(self: Box<Self>) -> Result<()>;
}

impl<C: Connection + ?Sized> Connection for &C {
    fn query(&self, text: &str, args: &[Value]) -> Result<ResultSet> {
        (**self).query(text, args)
    }

    fn exec(&self, text: &str, args: &[Value]) -> Result<ExecOutcome> {
        (**self).exec(text, args)
    }

    fn begin(&self) -> Result<Box<dyn Transaction + '_>> {
        (**self).begin()
    }
}

impl<C: Connection + ?Sized> Connection for std::sync::Arc<C> {
    fn query(&self, text: &str, args: &[Value]) -> Result<ResultSet> {
        (**self).query(text, args)
    }

    fn exec(&self, text: &str, args: &[Value]) -> Result<ExecOutcome> {
        (**self).exec(text, args)
    }

    fn begin(&self) -> Result<Box<dyn Transaction + '_>> {
        (**self).begin()
    }
}
