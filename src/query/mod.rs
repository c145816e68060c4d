//! Relational query seam
//!
//! The [`Query`] trait is the interface to the relational engine the
//! projection runs on top of. [`MemoryQuery`] implements it over records
//! held in memory.

mod ast;
mod engine;
mod filters;
mod memory;
mod sorter;

pub use ast::{FilterOp, Predicate, SortDirection, SortKey};
pub use engine::Query;
pub use filters::PredicateFilter;
pub use memory::{MemoryQuery, MemoryRecords};
pub use sorter::RecordSorter;
