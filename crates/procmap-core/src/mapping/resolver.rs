//! Field-order resolver
//!
//! Turns the order markers declared on a shape into a [`FieldSequence`].
//! Resolution is a pure function of the declared metadata.

use super::sequence::FieldSequence;
use crate::errors::{MapError, Result};
use crate::shape::FieldDef;
use std::collections::BTreeMap;

/// Resolve the positional field order of `shape`
///
/// Unmarked fields are skipped. Markers must be positive integers forming the
/// contiguous range `1..=n`.
///
/// # Errors
///
/// - `InvalidOrder`: a marker is not a positive integer
/// - `DuplicateOrder`: two fields claim the same position
/// - `NoOrderedFields`: no field carries a marker
/// - `OrderNotStartingAtOne`: position 1 is unclaimed
/// - `NonContiguousOrder`: a claimed position follows an unclaimed one
pub fn resolve(shape: &str, defs: &[FieldDef]) -> Result<FieldSequence> {
    let mut slots: Vec<Option<&'static str>> = vec![None; defs.len()];
    // Positions past the field count can never be contiguous but still take
    // part in duplicate detection
    let mut overflow: BTreeMap<usize, &'static str> = BTreeMap::new();
    let mut annotated = 0usize;

    for def in defs {
        let Some(raw) = def.order else {
            continue;
        };
        let order = parse_order(shape, def.name, raw)?;
        annotated += 1;

        let claimed = match slots.get_mut(order - 1) {
            Some(slot) => slot,
            None => {
                if let Some(first) = overflow.insert(order, def.name) {
                    return Err(duplicate(shape, order, first, def.name));
                }
                continue;
            }
        };
        if let Some(first) = *claimed {
            return Err(duplicate(shape, order, first, def.name));
        }
        *claimed = Some(def.name);
    }

    if annotated == 0 {
        return Err(MapError::NoOrderedFields {
            shape: shape.to_string(),
        });
    }

    if slots.first().copied().flatten().is_none() {
        return Err(MapError::OrderNotStartingAtOne {
            shape: shape.to_string(),
        });
    }

    let prefix = slots.iter().take_while(|slot| slot.is_some()).count();
    if slots[prefix..].iter().any(Option::is_some) || !overflow.is_empty() {
        return Err(MapError::NonContiguousOrder {
            shape: shape.to_string(),
            missing: prefix + 1,
        });
    }

    let fields: Vec<&'static str> = slots.into_iter().flatten().collect();
    tracing::debug!(shape, field_count = fields.len(), "resolved field order");
    Ok(FieldSequence::new(shape, fields))
}

fn parse_order(shape: &str, field: &str, raw: &str) -> Result<usize> {
    match raw.parse::<usize>() {
        Ok(order) if order > 0 => Ok(order),
        _ => Err(MapError::InvalidOrder {
            shape: shape.to_string(),
            field: field.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn duplicate(shape: &str, order: usize, first: &str, second: &str) -> MapError {
    MapError::DuplicateOrder {
        shape: shape.to_string(),
        order,
        first: first.to_string(),
        second: second.to_string(),
    }
}
