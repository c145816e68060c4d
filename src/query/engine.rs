//! Relational query engine seam
//!
//! Query objects are consumed builder-style: each refinement returns a new
//! query. Counting does not consume the query, execution does.

use super::ast::{Predicate, SortKey};
use crate::errors::ProjectionResult;
use crate::record::RecordRef;

/// A relational query able to filter, order, page and count its rows
pub trait Query: Sized {
    /// Rows produced on execution, in delivery order
    type Records: Iterator<Item = ProjectionResult<RecordRef>>;

    /// Restricts rows to those matching every predicate
    fn filter(self, predicates: &[Predicate]) -> Self;

    /// Appends ordering expressions
    fn order_by(self, keys: &[SortKey]) -> Self;

    /// Caps the number of rows returned
    fn limit(self, n: usize) -> Self;

    /// Skips the first `n` rows
    fn offset(self, n: usize) -> Self;

    /// Counts the rows the query would return as currently refined.
    ///
    /// A count taken after `limit`/`offset` reflects the paged population.
    fn count(&self) -> ProjectionResult<usize>;

    /// Runs the query
    fn execute(self) -> Self::Records;
}
