//! Resolved field sequence

use std::sync::Arc;

/// Validated positional field order of one shape
///
/// Element `i` is the field bound to procedure parameter (or result column)
/// `i + 1`. Cloning shares the underlying storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSequence {
    shape: Arc<str>,
    fields: Arc<[&'static str]>,
}

impl FieldSequence {
    pub fn new(shape: &str, fields: Vec<&'static str>) -> Self {
        Self {
            shape: Arc::from(shape),
            fields: Arc::from(fields),
        }
    }

    /// Name of the shape this sequence was resolved for
    pub fn shape(&self) -> &str {
        &self.shape
    }

    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().copied()
    }

    /// True when both handles point at the same cached storage
    pub fn shares_storage(&self, other: &FieldSequence) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields)
    }
}
