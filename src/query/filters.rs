//! Predicate filtering for the in-memory engine
//!
//! Comparisons are exact: no coercion between text and numbers, and a null
//! or missing attribute never satisfies a comparison.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use uuid::Uuid;

use super::ast::{FilterOp, Predicate};
use crate::record::{AttrValue, Record};

/// Evaluates predicates against records
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks if a record matches all predicates
    pub fn matches(record: &dyn Record, predicates: &[Predicate]) -> bool {
        // All predicates must match (AND semantics)
        predicates
            .iter()
            .all(|pred| Self::matches_predicate(record, pred))
    }

    /// Checks if a record matches a single predicate
    fn matches_predicate(record: &dyn Record, predicate: &Predicate) -> bool {
        let value = record.get(&predicate.field).filter(|v| !v.is_null());

        match (&predicate.op, value) {
            (FilterOp::IsNull(expect_null), value) => value.is_none() == *expect_null,
            (_, None) => false,
            (FilterOp::Eq(expected), Some(actual)) => {
                Self::compare(&actual, expected) == Some(Ordering::Equal)
            }
            (FilterOp::Ne(expected), Some(actual)) => {
                Self::compare(&actual, expected) != Some(Ordering::Equal)
            }
            (FilterOp::Gt(bound), Some(actual)) => {
                Self::compare(&actual, bound) == Some(Ordering::Greater)
            }
            (FilterOp::Gte(bound), Some(actual)) => matches!(
                Self::compare(&actual, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            (FilterOp::Lt(bound), Some(actual)) => {
                Self::compare(&actual, bound) == Some(Ordering::Less)
            }
            (FilterOp::Lte(bound), Some(actual)) => matches!(
                Self::compare(&actual, bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
            (FilterOp::In(values), Some(actual)) => values
                .iter()
                .any(|v| Self::compare(&actual, v) == Some(Ordering::Equal)),
            (FilterOp::Like(pattern), Some(actual)) => actual
                .as_str()
                .map_or(false, |text| Self::like_match(text, pattern)),
        }
    }

    /// Orders an attribute against a predicate operand.
    ///
    /// Returns `None` for incomparable kinds.
    fn compare(actual: &AttrValue, expected: &Value) -> Option<Ordering> {
        match (actual, expected) {
            (AttrValue::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (AttrValue::Int(a), Value::Number(b)) => match b.as_i64() {
                Some(b) => Some(a.cmp(&b)),
                None => (*a as f64).partial_cmp(&b.as_f64()?),
            },
            (AttrValue::Float(a), Value::Number(b)) => a.partial_cmp(&b.as_f64()?),
            (AttrValue::Text(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
            (AttrValue::Enum(member), Value::String(b)) => Some(member.value().cmp(b.as_str())),
            (AttrValue::Uuid(a), Value::String(b)) => Uuid::parse_str(b).ok().map(|b| a.cmp(&b)),
            (AttrValue::Timestamp(a), Value::String(b)) => DateTime::parse_from_rfc3339(b)
                .ok()
                .map(|b| a.cmp(&b.with_timezone(&Utc))),
            _ => None,
        }
    }

    /// SQL LIKE: `%` matches any run, `_` one character
    fn like_match(text: &str, pattern: &str) -> bool {
        let mut expr = String::from("(?s)^");
        for c in pattern.chars() {
            match c {
                '%' => expr.push_str(".*"),
                '_' => expr.push('.'),
                c => expr.push_str(&regex::escape(c.encode_utf8(&mut [0u8; 4]))),
            }
        }
        expr.push('$');

        Regex::new(&expr).map_or(false, |re| re.is_match(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MemoryRecord;
    use chrono::TimeZone;
    use serde_json::json;

    fn alice() -> MemoryRecord {
        MemoryRecord::new("User")
            .with("name", "Alice")
            .with("age", 30)
            .with("score", 4.5)
            .with("nickname", None::<String>)
            .with(
                "joined",
                Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            )
    }

    #[test]
    fn test_equality_match() {
        let record = alice();
        assert!(PredicateFilter::matches(&record, &[Predicate::eq("name", json!("Alice"))]));
        assert!(!PredicateFilter::matches(&record, &[Predicate::eq("name", json!("Bob"))]));
    }

    #[test]
    fn test_no_type_coercion() {
        let record = alice();
        assert!(!PredicateFilter::matches(&record, &[Predicate::eq("age", json!("30"))]));
        assert!(PredicateFilter::matches(&record, &[Predicate::eq("age", json!(30))]));
    }

    #[test]
    fn test_range_predicates() {
        let record = alice();
        assert!(PredicateFilter::matches(&record, &[Predicate::gte("age", json!(30))]));
        assert!(!PredicateFilter::matches(&record, &[Predicate::gt("age", json!(30))]));
        assert!(PredicateFilter::matches(&record, &[Predicate::lt("score", json!(5))]));
        assert!(PredicateFilter::matches(&record, &[Predicate::lte("age", json!(30.0))]));
    }

    #[test]
    fn test_null_and_missing_never_compare() {
        let record = alice();
        assert!(!PredicateFilter::matches(&record, &[Predicate::eq("nickname", json!("Al"))]));
        assert!(!PredicateFilter::matches(&record, &[Predicate::ne("email", json!("x"))]));
        assert!(PredicateFilter::matches(&record, &[Predicate::is_null("nickname")]));
        assert!(PredicateFilter::matches(&record, &[Predicate::is_null("email")]));
        assert!(PredicateFilter::matches(&record, &[Predicate::is_not_null("name")]));
    }

    #[test]
    fn test_in_and_like() {
        let record = alice();
        assert!(PredicateFilter::matches(
            &record,
            &[Predicate::is_in("age", vec![json!(20), json!(30)])]
        ));
        assert!(PredicateFilter::matches(&record, &[Predicate::like("name", "Al%")]));
        assert!(PredicateFilter::matches(&record, &[Predicate::like("name", "_lice")]));
        assert!(!PredicateFilter::matches(&record, &[Predicate::like("name", "al%")]));
        assert!(!PredicateFilter::matches(&record, &[Predicate::like("name", "A.ice")]));
    }

    #[test]
    fn test_timestamp_comparison() {
        let record = alice();
        assert!(PredicateFilter::matches(
            &record,
            &[Predicate::gt("joined", json!("2024-01-01T00:00:00Z"))]
        ));
    }

    #[test]
    fn test_multiple_predicates_and() {
        let record = alice();
        let preds = vec![
            Predicate::gte("age", json!(18)),
            Predicate::eq("name", json!("Alice")),
        ];
        assert!(PredicateFilter::matches(&record, &preds));

        let preds = vec![
            Predicate::gte("age", json!(18)),
            Predicate::eq("name", json!("Bob")),
        ];
        assert!(!PredicateFilter::matches(&record, &preds));
    }
}
