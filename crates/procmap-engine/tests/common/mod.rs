//! Shared fixtures for procmap-engine integration tests

#![allow(dead_code)]

use procmap_core::connection::{Connection, ExecOutcome, ResultSet, Row, Transaction};
use procmap_core::descriptor::RecordDescriptor;
use procmap_core::errors::{MapError, Result};
use procmap_core::shape::NoOutput;
use procmap_core::value::Value;
use std::sync::Mutex;

procmap_core::record_shape! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct CreateUser {
        #[order = "2"]
        pub email: String,
        #[order = "1"]
        pub name: String,
        pub note: String,
    }
}

impl RecordDescriptor for CreateUser {
    type Output = NoOutput;

    fn input_shape_name(&self) -> &str {
        "CreateUser"
    }

    fn procedure_name(&self) -> &str {
        "create_user"
    }

    fn output_shape_name(&self) -> &str {
        "NoOutput"
    }

    fn new_empty_output(&self) -> NoOutput {
        NoOutput
    }
}

impl CreateUser {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            note: String::new(),
        }
    }
}

procmap_core::record_shape! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct UserRow {
        #[order = "1"]
        pub id: i64,
        #[order = "2"]
        pub name: String,
        #[order = "3"]
        pub email: String,
    }
}

procmap_core::record_shape! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ListUsers {
        #[order = "1"]
        pub name_prefix: String,
    }
}

impl RecordDescriptor for ListUsers {
    type Output = UserRow;

    fn input_shape_name(&self) -> &str {
        "ListUsers"
    }

    fn procedure_name(&self) -> &str {
        "list_users"
    }

    fn output_shape_name(&self) -> &str {
        "UserRow"
    }

    fn new_empty_output(&self) -> UserRow {
        UserRow::default()
    }
}

/// Everything a stub connection was asked to do, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Query(String, Vec<Value>),
    Exec(String, Vec<Value>),
    Begin,
    TxExec(String, Vec<Value>),
    Commit,
    Rollback,
}

/// In-memory connection that records calls and returns canned rows
///
/// Any exec whose arguments contain `fail_marker` fails with an execution
/// error.
#[derive(Default)]
pub struct StubConnection {
    pub calls: Mutex<Vec<Call>>,
    pub rows: Vec<Row>,
    pub columns: Vec<String>,
    pub fail_marker: Option<Value>,
}

impl StubConnection {
    pub fn returning(columns: &[&str], rows: Vec<Row>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            ..Self::default()
        }
    }

    pub fn failing_on(marker: Value) -> Self {
        Self {
            fail_marker: Some(marker),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, text: &str, args: &[Value]) -> Result<ExecOutcome> {
        match &self.fail_marker {
            Some(marker) if args.contains(marker) => {
                Err(MapError::execution(text, "stub failure"))
            }
            _ => Ok(ExecOutcome {
                rows_affected: 1,
                last_insert_id: 0,
            }),
        }
    }
}

impl Connection for StubConnection {
    fn query(&self, text: &str, args: &[Value]) -> Result<ResultSet> {
        self.record(Call::Query(text.to_string(), args.to_vec()));
        Ok(ResultSet::new(self.columns.clone(), self.rows.clone()))
    }

    fn exec(&self, text: &str, args: &[Value]) -> Result<ExecOutcome> {
        self.record(Call::Exec(text.to_string(), args.to_vec()));
        self.check(text, args)
    }

    fn begin(&self) -> Result<Box<dyn Transaction + '_>> {
        self.record(Call::Begin);
        Ok(Box::new(StubTransaction { conn: self }))
    }
}

pub struct StubTransaction<'a> {
    conn: &'a StubConnection,
}

impl Transaction for StubTransaction<'_> {
    fn exec(&mut self, text: &str, args: &[Value]) -> Result<ExecOutcome> {
        self.conn
            .record(Call::TxExec(text.to_string(), args.to_vec()));
        self.conn.check(text, args)
    }

    fn commit(self: Box<Self>) -> Result<()> {
        self.conn.record(Call::Commit);
        Ok(())
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        self.conn.record(Call::Rollback);
        Ok(())
    }
}
