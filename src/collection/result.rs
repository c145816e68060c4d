//! Result collection
//!
//! Wraps one relational query for one request. Construction applies the
//! filter and ordering, captures the count, then pages the query. Documents
//! are produced lazily, once.

use tracing::debug;

use super::options::CollectionOptions;
use crate::document::{Document, EmbeddingResolver, FieldProjection, Sanitizer};
use crate::domain::Domain;
use crate::errors::ProjectionResult;
use crate::query::Query;

/// Paged, projected view over a relational query
pub struct ResultCollection<'a, Q: Query> {
    query: Option<Q>,
    fields: FieldProjection,
    resource: String,
    single_query_embedding: bool,
    count: usize,
    sanitizer: Sanitizer<'a>,
}

impl<'a, Q: Query> ResultCollection<'a, Q> {
    /// Builds the collection.
    ///
    /// Unless the query is already shaped, the count is taken after
    /// filtering and before the page limit is applied.
    pub fn new(
        query: Q,
        fields: FieldProjection,
        options: CollectionOptions,
        domain: &'a Domain,
        embedding: &'a dyn EmbeddingResolver,
    ) -> ProjectionResult<Self> {
        domain.descriptor(&options.resource)?;

        let (query, count, sanitizer) = if options.single_query_embedding {
            let count = options.total_count.unwrap_or(0);
            debug!(resource = %options.resource, count, "shaped query wrapped");
            (query, count, Sanitizer::embedding(domain, embedding))
        } else {
            let mut query = query;
            if !options.spec.is_empty() {
                query = query.filter(&options.spec);
            }
            if !options.sort.is_empty() {
                query = query.order_by(&options.sort);
            }
            let count = query.count()?;

            let mut limit = None;
            let mut offset = None;
            if let Some(page_size) = options.page_size() {
                query = query.limit(page_size);
                limit = Some(page_size);
                if let Some(skip) = options.page_offset(page_size) {
                    query = query.offset(skip);
                    offset = Some(skip);
                }
            }
            debug!(
                resource = %options.resource,
                count,
                ?limit,
                ?offset,
                filters = options.spec.len(),
                "collection query prepared"
            );
            (query, count, Sanitizer::flat(domain))
        };

        Ok(Self {
            query: Some(query),
            fields,
            resource: options.resource,
            single_query_embedding: options.single_query_embedding,
            count,
            sanitizer,
        })
    }

    /// Number of matching records, ignoring paging
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn fields(&self) -> &FieldProjection {
        &self.fields
    }

    /// The prepared query, until documents are requested
    pub fn query(&self) -> Option<&Q> {
        self.query.as_ref()
    }

    /// Returns true once the documents have been requested
    pub fn is_consumed(&self) -> bool {
        self.query.is_none()
    }

    /// Lazily converts the query rows into documents.
    ///
    /// The query runs once; later calls yield nothing.
    pub fn documents(&mut self) -> Documents<'_, Q> {
        let rows = self.query.take().map(Query::execute);
        Documents {
            rows,
            fields: &self.fields,
            resource: &self.resource,
            single_query_embedding: self.single_query_embedding,
            sanitizer: self.sanitizer,
        }
    }
}

/// Documents of a [`ResultCollection`], in query order
pub struct Documents<'c, Q: Query> {
    rows: Option<Q::Records>,
    fields: &'c FieldProjection,
    resource: &'c str,
    single_query_embedding: bool,
    sanitizer: Sanitizer<'c>,
}

impl<Q: Query> Iterator for Documents<'_, Q> {
    type Item = ProjectionResult<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.rows.as_mut()?.next()? {
            Ok(record) => record,
            Err(err) => return Some(Err(err)),
        };

        let document = if self.single_query_embedding {
            self.sanitizer.record_to_document(
                record.as_ref(),
                self.fields,
                self.resource,
                self.resource,
                "",
            )
        } else {
            self.sanitizer
                .flat_document(record.as_ref(), self.fields, self.resource)
        };
        Some(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentValue, NoEmbedding};
    use crate::domain::ResourceDescriptor;
    use crate::query::{MemoryQuery, Predicate, SortKey};
    use crate::record::{MemoryRecord, RecordRef};
    use serde_json::json;

    fn domain() -> Domain {
        Domain::default()
            .with_resource(ResourceDescriptor::new("items").with_source("Item"))
            .unwrap()
    }

    fn items(n: i64) -> Vec<RecordRef> {
        (1..=n)
            .map(|i| {
                MemoryRecord::new("Item")
                    .with("_id", i)
                    .with("even", i % 2 == 0)
                    .with("_etag", "")
                    .into_ref()
            })
            .collect()
    }

    fn ids<Q: Query>(collection: &mut ResultCollection<'_, Q>) -> Vec<i64> {
        collection
            .documents()
            .map(|doc| doc.unwrap()["_id"].as_i64().unwrap())
            .collect()
    }

    #[test]
    fn test_count_before_paging() {
        let domain = domain();
        let options = CollectionOptions::new("items").with_page(10, 3);
        let collection = ResultCollection::new(
            MemoryQuery::new(items(25)),
            FieldProjection::from_paths(["_id"]),
            options,
            &domain,
            &NoEmbedding,
        )
        .unwrap();

        assert_eq!(collection.count(), 25);
        let query = collection.query().unwrap();
        assert_eq!(query.applied_limit(), Some(10));
        assert_eq!(query.applied_offset(), Some(20));
    }

    #[test]
    fn test_filter_and_sort() {
        let domain = domain();
        let options = CollectionOptions::new("items")
            .with_spec(vec![Predicate::eq("even", json!(true))])
            .with_sort(vec![SortKey::desc("_id")]);
        let mut collection = ResultCollection::new(
            MemoryQuery::new(items(6)),
            FieldProjection::from_paths(["_id"]),
            options,
            &domain,
            &NoEmbedding,
        )
        .unwrap();

        assert_eq!(collection.count(), 3);
        assert_eq!(ids(&mut collection), vec![6, 4, 2]);
    }

    #[test]
    fn test_documents_single_pass() {
        let domain = domain();
        let mut collection = ResultCollection::new(
            MemoryQuery::new(items(3)),
            FieldProjection::from_paths(["_id"]),
            CollectionOptions::new("items"),
            &domain,
            &NoEmbedding,
        )
        .unwrap();

        assert_eq!(ids(&mut collection), vec![1, 2, 3]);
        assert!(collection.is_consumed());
        assert_eq!(collection.documents().count(), 0);
        assert_eq!(collection.count(), 3);
    }

    #[test]
    fn test_shaped_query_uses_total_count() {
        let domain = domain();
        let options = CollectionOptions::new("items")
            .with_page(2, 1)
            .single_query(Some(40));
        let mut collection = ResultCollection::new(
            MemoryQuery::new(items(3)),
            FieldProjection::from_paths(["_id"]),
            options,
            &domain,
            &NoEmbedding,
        )
        .unwrap();

        assert_eq!(collection.count(), 40);
        assert_eq!(collection.query().unwrap().applied_limit(), None);
        assert_eq!(ids(&mut collection), vec![1, 2, 3]);

        let shaped = ResultCollection::new(
            MemoryQuery::new(items(3)),
            FieldProjection::new(),
            CollectionOptions::new("items").single_query(None),
            &domain,
            &NoEmbedding,
        )
        .unwrap();
        assert_eq!(shaped.count(), 0);
    }

    #[test]
    fn test_flat_documents_carry_bookkeeping() {
        let domain = domain();
        let record = MemoryRecord::new("Item")
            .with("_id", 1)
            .with("_updated", "2024-01-02")
            .with("secret", "x")
            .into_ref();
        let mut collection = ResultCollection::new(
            MemoryQuery::new(vec![record]),
            FieldProjection::from_paths(["_id"]),
            CollectionOptions::new("items"),
            &domain,
            &NoEmbedding,
        )
        .unwrap();

        let doc = collection.documents().next().unwrap().unwrap();
        assert_eq!(doc["_updated"], DocumentValue::Text("2024-01-02".into()));
        assert!(!doc.contains_key("secret"));
        assert!(!doc.contains_key("_etag"));
    }

    #[test]
    fn test_unknown_resource() {
        let domain = domain();
        let result = ResultCollection::new(
            MemoryQuery::new(Vec::new()),
            FieldProjection::new(),
            CollectionOptions::new("ghosts"),
            &domain,
            &NoEmbedding,
        );
        assert!(result.is_err());
    }
}
