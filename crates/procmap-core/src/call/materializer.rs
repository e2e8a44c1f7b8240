//! Result materializer
//!
//! Turns result rows into freshly allocated output records, column `i` going
//! to the field at position `i` of the output sequence.

use crate::connection::{ResultSet, Row};
use crate::errors::{MapError, Result};
use crate::mapping::FieldSequence;
use crate::shape::{FieldError, Shape};

/// Materialize every row of `result` into a new record from `new_output`
///
/// Zero rows yields an empty vector. The first failing row abandons the
/// whole result set.
///
/// # Errors
///
/// - `Scan`: column count differs from the sequence, or a value does not
///   convert to its field's type
/// - `FieldAccess`: the output record does not expose a sequenced field
pub fn materialize<T, F>(
    mut new_output: F,
    sequence: &FieldSequence,
    result: ResultSet,
) -> Result<Vec<T>>
where
    T: Shape,
    F: FnMut() -> T,
{
    let ResultSet { columns, rows } = result;
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let mut record = new_output();
        scan_row(&mut record, sequence, row, &columns)?;
        records.push(record);
    }
    tracing::debug!(
        shape = sequence.shape(),
        row_count = records.len(),
        "materialized rows"
    );
    Ok(records)
}

/// Assign one row's columns to `record` in sequence order
///
/// # Errors
///
/// Same as [`materialize`].
pub fn scan_row<T: Shape + ?Sized>(
    record: &mut T,
    sequence: &FieldSequence,
    row: Row,
    columns: &[String],
) -> Result<()> {
    if row.len() != sequence.len() {
        let column = row.len().min(sequence.len());
        return Err(MapError::Scan {
            column,
            field: sequence.fields().get(column).copied().unwrap_or_default().to_string(),
            message: format!(
                "expected {} columns for shape {}, row has {}",
                sequence.len(),
                sequence.shape(),
                row.len()
            ),
        });
    }

    for (column, (field, value)) in sequence.iter().zip(row.into_values()).enumerate() {
        record.set_field(field, value).map_err(|err| match err {
            FieldError::Missing(field) => MapError::FieldAccess {
                shape: sequence.shape().to_string(),
                field,
            },
            FieldError::Value(value_err) => MapError::Scan {
                column,
                field: field.to_string(),
                message: match columns.get(column) {
                    Some(name) => format!("column {}: {}", name, value_err),
                    None => value_err.to_string(),
                },
            },
        })?;
    }
    Ok(())
}
