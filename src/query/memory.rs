//! In-memory query engine
//!
//! Holds a vector of records and applies refinements lazily: filtering,
//! ordering, offset and limit run when the query is counted or executed,
//! in SQL order (filter, order, offset, limit).

use super::ast::{Predicate, SortKey};
use super::engine::Query;
use super::filters::PredicateFilter;
use super::sorter::RecordSorter;
use crate::errors::ProjectionResult;
use crate::record::RecordRef;

/// Query over records held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryQuery {
    records: Vec<RecordRef>,
    predicates: Vec<Predicate>,
    sort: Vec<SortKey>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl MemoryQuery {
    /// Creates an unrefined query over `records`
    pub fn new(records: Vec<RecordRef>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Predicates applied so far
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Ordering expressions applied so far
    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort
    }

    /// Limit applied, if any
    pub fn applied_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Offset applied, if any
    pub fn applied_offset(&self) -> Option<usize> {
        self.offset
    }

    fn rows(&self) -> Vec<RecordRef> {
        let mut rows: Vec<RecordRef> = self
            .records
            .iter()
            .filter(|r| PredicateFilter::matches(r.as_ref(), &self.predicates))
            .cloned()
            .collect();

        RecordSorter::sort(&mut rows, &self.sort);

        let offset = self.offset.unwrap_or(0);
        let limit = self.limit.unwrap_or(usize::MAX);
        rows.into_iter().skip(offset).take(limit).collect()
    }
}

impl Query for MemoryQuery {
    type Records = MemoryRecords;

    fn filter(mut self, predicates: &[Predicate]) -> Self {
        self.predicates.extend_from_slice(predicates);
        self
    }

    fn order_by(mut self, keys: &[SortKey]) -> Self {
        self.sort.extend_from_slice(keys);
        self
    }

    fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    fn offset(mut self, n: usize) -> Self {
        self.offset = Some(n);
        self
    }

    fn count(&self) -> ProjectionResult<usize> {
        Ok(self.rows().len())
    }

    fn execute(self) -> MemoryRecords {
        MemoryRecords {
            rows: self.rows().into_iter(),
        }
    }
}

/// Rows produced by a [`MemoryQuery`]
#[derive(Debug)]
pub struct MemoryRecords {
    rows: std::vec::IntoIter<RecordRef>,
}

impl Iterator for MemoryRecords {
    type Item = ProjectionResult<RecordRef>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(Ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}
