//! Parameter binder

use crate::errors::{MapError, Result};
use crate::mapping::FieldSequence;
use crate::shape::Shape;
use crate::value::Value;

/// Read `record`'s fields in sequence order into positional arguments
///
/// # Errors
///
/// `FieldAccess` if the record does not expose a field the sequence names,
/// which means the descriptor and the concrete record disagree.
pub fn bind<S: Shape + ?Sized>(record: &S, sequence: &FieldSequence) -> Result<Vec<Value>> {
    sequence
        .iter()
        .map(|field| {
            record.get_field(field).ok_or_else(|| MapError::FieldAccess {
                shape: sequence.shape().to_string(),
                field: field.to_string(),
            })
        })
        .collect()
}
