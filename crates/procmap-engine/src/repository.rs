//! Repository façade with boundary logging.
//!
//! Every public operation follows resolve → build → bind → execute, plus
//! materialize for queries. Errors come back exactly as the failing stage
//! raised them.
//!
//! ## Logging Ownership
//!
//! The façade owns lifecycle logging for each operation:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Per-row batch failures are logged at WARN with `event = "row_failed"`.
//! Core components use only `tracing::debug!()`.

use crate::config::{BatchFailurePolicy, RepositoryConfig};
use procmap_core::call::{bind, build_call, materialize};
use procmap_core::connection::Connection;
use procmap_core::descriptor::RecordDescriptor;
use procmap_core::errors::{MapError, Result};
use procmap_core::mapping::{resolve, FieldOrderCache, FieldSequence};
use procmap_core::shape::Shape;
use procmap_core::value::{FieldValue, Value};
use procmap_core::{log_op_end, log_op_error, log_op_start};
use procmap_core_types::schema::EVENT_ROW_FAILED;
use std::time::Instant;

/// One failed row of a batch insert
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    /// Position of the record in the batch, 0-based
    pub index: usize,
    pub error: MapError,
}

/// What happened to each row of a batch insert
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<BatchFailure>,
    pub committed: bool,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.committed
    }
}

/// Maps descriptors onto stored-procedure calls over one connection
///
/// Owns one field-order cache for input shapes and one for output shapes, so
/// metadata is resolved at most once per shape for the life of the
/// repository.
pub struct Repository<C> {
    conn: C,
    config: RepositoryConfig,
    input_orders: FieldOrderCache,
    output_orders: FieldOrderCache,
}

impl<C: Connection> Repository<C> {
    pub fn new(conn: C) -> Self {
        Self::with_config(conn, RepositoryConfig::default())
    }

    pub fn with_config(conn: C, config: RepositoryConfig) -> Self {
        Self {
            conn,
            config,
            input_orders: FieldOrderCache::new(),
            output_orders: FieldOrderCache::new(),
        }
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Resolved input order for `record`'s shape
    ///
    /// # Errors
    ///
    /// Any resolution error for the input shape.
    pub fn input_order<D: RecordDescriptor>(&self, record: &D) -> Result<FieldSequence> {
        let shape = record.input_shape_name();
        self.input_orders
            .get_or_compute(shape, || resolve(shape, record.field_defs()))
    }

    /// Resolved output order for `record`'s result shape
    ///
    /// # Errors
    ///
    /// Any resolution error for the output shape.
    pub fn output_order<D: RecordDescriptor>(&self, record: &D) -> Result<FieldSequence> {
        let shape = record.output_shape_name();
        self.output_orders.get_or_compute(shape, || {
            resolve(shape, record.new_empty_output().field_defs())
        })
    }

    /// Run the record's procedure, discarding any rows
    ///
    /// # Errors
    ///
    /// Resolution, `FieldAccess` or `Execution`, as raised.
    pub fn insert<D: RecordDescriptor>(&self, record: &D) -> Result<()> {
        self.observe("insert", record.procedure_name(), || self.exec_one(record))
    }

    /// Same contract as [`insert`](Self::insert)
    ///
    /// # Errors
    ///
    /// Resolution, `FieldAccess` or `Execution`, as raised.
    pub fn update<D: RecordDescriptor>(&self, record: &D) -> Result<()> {
        self.observe("update", record.procedure_name(), || self.exec_one(record))
    }

    /// Same contract as [`insert`](Self::insert)
    ///
    /// # Errors
    ///
    /// Resolution, `FieldAccess` or `Execution`, as raised.
    pub fn delete<D: RecordDescriptor>(&self, record: &D) -> Result<()> {
        self.observe("delete", record.procedure_name(), || self.exec_one(record))
    }

    /// Run the record's procedure and read column 0 of the first row as an id
    ///
    /// Returns 0 when the procedure produces no rows.
    ///
    /// # Errors
    ///
    /// Resolution, `FieldAccess`, `Execution`, or `Scan` when the first column
    /// is missing or not an integer.
    pub fn insert_and_return_id<D: RecordDescriptor>(&self, record: &D) -> Result<i64> {
        self.observe("insert_and_return_id", record.procedure_name(), || {
            let (text, args) = self.prepare(record)?;
            let result = self.conn.query(&text, &args)?;

            let Some(row) = result.rows.into_iter().next() else {
                return Ok(0);
            };
            let column = result.columns.first().cloned().unwrap_or_default();
            let value = row.into_values().into_iter().next().ok_or_else(|| MapError::Scan {
                column: 0,
                field: column.clone(),
                message: "row has no columns".to_string(),
            })?;
            i64::from_value(value).map_err(|e| MapError::Scan {
                column: 0,
                field: column,
                message: e.to_string(),
            })
        })
    }

    /// Run the record's procedure and materialize every row
    ///
    /// # Errors
    ///
    /// Resolution (input or output shape), `FieldAccess`, `Execution` or
    /// `Scan`, as raised.
    pub fn query<D: RecordDescriptor>(&self, record: &D) -> Result<Vec<D::Output>> {
        self.observe("query", record.procedure_name(), || {
            let input = self.input_order(record)?;
            let output = self.output_order(record)?;
            let text = build_call(record.procedure_name(), input.len());
            let args = bind(record, &input)?;
            let result = self.conn.query(&text, &args)?;
            let rows = materialize(|| record.new_empty_output(), &output, result)?;
            tracing::debug!(
                procedure = record.procedure_name(),
                row_count = rows.len(),
                "query materialized"
            );
            Ok(rows)
        })
    }

    /// Insert every record in one transaction
    ///
    /// Field order and procedure come from the first record. Under
    /// [`BatchFailurePolicy::ContinueAndCommit`] rows the connection rejects are
    /// logged and skipped, and the rows that succeeded are committed. A record
    /// that cannot bind its fields rolls the whole batch back under either
    /// policy.
    ///
    /// # Errors
    ///
    /// `EmptyBatch`, resolution of the first record, `FieldAccess` from any
    /// record, `Transaction` on begin or commit, or the first row error under
    /// [`BatchFailurePolicy::RollbackOnFailure`].
    pub fn batch_insert<D: RecordDescriptor>(&self, records: &[D]) -> Result<()> {
        self.batch_insert_with_outcome(records).map(|_| ())
    }

    /// [`batch_insert`](Self::batch_insert), reporting what happened to each row
    ///
    /// # Errors
    ///
    /// Same as [`batch_insert`](Self::batch_insert).
    pub fn batch_insert_with_outcome<D: RecordDescriptor>(
        &self,
        records: &[D],
    ) -> Result<BatchOutcome> {
        let procedure = records
            .first()
            .map(|r| r.procedure_name())
            .unwrap_or_default();
        self.observe("batch_insert", procedure, || self.batch_impl(records))
    }

    fn batch_impl<D: RecordDescriptor>(&self, records: &[D]) -> Result<BatchOutcome> {
        let first = records.first().ok_or(MapError::EmptyBatch)?;
        let sequence = self.input_order(first)?;
        let text = build_call(first.procedure_name(), sequence.len());

        let mut tx = self.conn.begin()?;
        let mut outcome = BatchOutcome::default();

        for (index, record) in records.iter().enumerate() {
            // A record that cannot supply its own fields is a descriptor defect,
            // not a row failure
            let args = match bind(record, &sequence) {
                Ok(args) => args,
                Err(error) => {
                    if let Err(rollback) = tx.rollback() {
                        tracing::warn!(error = %rollback, "batch rollback failed");
                    }
                    return Err(error);
                }
            };

            outcome.attempted += 1;
            let error = match tx.exec(&text, &args) {
                Ok(_) => {
                    outcome.succeeded += 1;
                    continue;
                }
                Err(error) => error,
            };

            tracing::warn!(
                op = "batch_insert",
                event = EVENT_ROW_FAILED,
                row_index = index,
                err_code = error.code(),
                error = %error,
                "batch row failed"
            );

            if self.config.batch_failure_policy == BatchFailurePolicy::RollbackOnFailure {
                if let Err(rollback) = tx.rollback() {
                    tracing::warn!(error = %rollback, "batch rollback failed");
                }
                return Err(error);
            }
            outcome.failures.push(BatchFailure { index, error });
        }

        tx.commit()?;
        outcome.committed = true;
        Ok(outcome)
    }

    fn prepare<D: RecordDescriptor>(&self, record: &D) -> Result<(String, Vec<Value>)> {
        let sequence = self.input_order(record)?;
        let args = bind(record, &sequence)?;
        Ok((build_call(record.procedure_name(), sequence.len()), args))
    }

    fn exec_one<D: RecordDescriptor>(&self, record: &D) -> Result<()> {
        let (text, args) = self.prepare(record)?;
        self.conn.exec(&text, &args)?;
        Ok(())
    }

    fn observe<T>(
        &self,
        op: &'static str,
        procedure: &str,
        body: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        log_op_start!(op, procedure = procedure);
        let start = Instant::now();

        let result = body();
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => {
                log_op_end!(op, duration_ms = duration_ms, procedure = procedure);
            }
            Err(e) => {
                log_op_error!(op, e, duration_ms = duration_ms, procedure = procedure);
            }
        }
        result
    }
}
