//! Result collection options

use crate::query::{Predicate, SortKey};

/// Parameters of a collection request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionOptions {
    /// Filter predicates
    pub spec: Vec<Predicate>,
    /// Ordering expressions
    pub sort: Vec<SortKey>,
    /// Page size; `None` or zero disables paging
    pub max_results: Option<usize>,
    /// 1-based page number
    pub page: Option<usize>,
    /// Resource the records belong to
    pub resource: String,
    /// Whether the query was already shaped and embeds per record
    pub single_query_embedding: bool,
    /// Count supplied by the caller of a shaped query
    pub total_count: Option<usize>,
}

impl CollectionOptions {
    /// Options for `resource` with no filtering, ordering or paging
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            ..Self::default()
        }
    }

    pub fn with_spec(mut self, spec: Vec<Predicate>) -> Self {
        self.spec = spec;
        self
    }

    pub fn with_sort(mut self, sort: Vec<SortKey>) -> Self {
        self.sort = sort;
        self
    }

    /// Sets page size and page number
    pub fn with_page(mut self, max_results: usize, page: usize) -> Self {
        self.max_results = Some(max_results);
        self.page = Some(page);
        self
    }

    /// Marks the query as already shaped, reporting `total_count`
    pub fn single_query(mut self, total_count: Option<usize>) -> Self {
        self.single_query_embedding = true;
        self.total_count = total_count;
        self
    }

    /// Page size, when paging is enabled
    pub(crate) fn page_size(&self) -> Option<usize> {
        self.max_results.filter(|n| *n > 0)
    }

    /// Rows skipped before the requested page
    pub(crate) fn page_offset(&self, page_size: usize) -> Option<usize> {
        self.page
            .filter(|p| *p > 0)
            .map(|p| (p - 1).saturating_mul(page_size))
    }
}
