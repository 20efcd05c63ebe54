//! Content tree query layer.
//!
//! Extension traits over SeaORM selects: UUID-set filtering that stays
//! under SQLite's bound-parameter ceiling, tree-ordered retrieval, and
//! deduplication by logical content identity.

mod tree;
mod uuid_filter;

pub use tree::{descendant_content_ids, descendants_of, siblings_of, ContentNodeQuery};
