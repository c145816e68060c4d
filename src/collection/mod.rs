//! Result collections
//!
//! A [`ResultCollection`] turns one relational query into a stable count
//! and a lazy sequence of documents for a single request.

mod options;
mod result;

pub use options::CollectionOptions;
pub use result::{Documents, ResultCollection};
