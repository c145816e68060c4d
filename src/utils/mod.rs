//! Query-construction helpers
//!
//! Stateless functions shared by the request layer: sort parsing,
//! relationship renaming, mapping merges and filter validation.

mod filters;
mod merge;
mod rename;
mod sort;

pub use filters::validate_filters;
pub use merge::{dict_update, merge_dicts, remove_none_values};
pub use rename::{
    rename_relationship_fields_in_dict, rename_relationship_fields_in_sort_args,
    rename_relationship_fields_in_str,
};
pub use sort::extract_sort_arg;
