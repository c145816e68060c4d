//! Record sorting for the in-memory engine
//!
//! Sorts by any number of keys, stably and deterministically.

use std::cmp::Ordering;

use super::ast::{SortDirection, SortKey};
use crate::record::{AttrValue, RecordRef};

/// Sorts records
pub struct RecordSorter;

impl RecordSorter {
    /// Sorts records by `keys`, earlier keys taking precedence.
    ///
    /// Sort is stable: records equal on every key keep their order.
    pub fn sort(records: &mut [RecordRef], keys: &[SortKey]) {
        if keys.is_empty() {
            return;
        }

        records.sort_by(|a, b| {
            for key in keys {
                let ordering =
                    Self::compare_values(a.get(&key.field).as_ref(), b.get(&key.field).as_ref());
                let ordering = match key.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    /// Compares two attribute values for sorting.
    ///
    /// Ordering rules:
    /// - missing < null < bool < number < text < timestamp < uuid < bytes
    /// - For same kinds, natural ordering
    fn compare_values(a: Option<&AttrValue>, b: Option<&AttrValue>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a_val), Some(b_val)) => {
                let type_order = |v: &AttrValue| -> u8 {
                    match v {
                        AttrValue::Null => 0,
                        AttrValue::Bool(_) => 1,
                        AttrValue::Int(_) | AttrValue::Float(_) => 2,
                        AttrValue::Text(_) | AttrValue::Enum(_) => 3,
                        AttrValue::Timestamp(_) => 4,
                        AttrValue::Uuid(_) => 5,
                        AttrValue::Bytes(_) => 6,
                        AttrValue::Record(_)
                        | AttrValue::Map(_)
                        | AttrValue::List(_)
                        | AttrValue::Set(_) => 7,
                    }
                };

                let a_type = type_order(a_val);
                let b_type = type_order(b_val);
                if a_type != b_type {
                    return a_type.cmp(&b_type);
                }

                match (a_val, b_val) {
                    (AttrValue::Bool(x), AttrValue::Bool(y)) => x.cmp(y),
                    (AttrValue::Int(x), AttrValue::Int(y)) => x.cmp(y),
                    (AttrValue::Int(_) | AttrValue::Float(_), _) => {
                        Self::compare_numbers(a_val, b_val)
                    }
                    (AttrValue::Timestamp(x), AttrValue::Timestamp(y)) => x.cmp(y),
                    (AttrValue::Uuid(x), AttrValue::Uuid(y)) => x.cmp(y),
                    (AttrValue::Bytes(x), AttrValue::Bytes(y)) => x.cmp(y),
                    (x, y) => match (x.as_str(), y.as_str()) {
                        (Some(x), Some(y)) => x.cmp(y),
                        _ => Ordering::Equal, // Records and collections not compared
                    },
                }
            }
        }
    }

    /// Total order over mixed numbers.
    ///
    /// Compares as `f64` with `total_cmp` (NaN after every other number),
    /// then ints before floats, then exact int value.
    fn compare_numbers(a: &AttrValue, b: &AttrValue) -> Ordering {
        let key = |v: &AttrValue| match v {
            AttrValue::Int(i) => (*i as f64, 0u8, *i),
            AttrValue::Float(f) => (*f, 1u8, 0),
            _ => (f64::NAN, 2u8, 0),
        };
        let (a_num, a_kind, a_int) = key(a);
        let (b_num, b_kind, b_int) = key(b);
        a_num
            .total_cmp(&b_num)
            .then(a_kind.cmp(&b_kind))
            .then(a_int.cmp(&b_int))
    }
}
