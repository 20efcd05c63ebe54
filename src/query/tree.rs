//! Tree-ordered content node queries over the nested-set encoding.

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};

use crate::db::dialect::QueryDialect;
use crate::db::entities::content_node;
use crate::presets::content_kinds;

use super::uuid_filter::UuidSetFilter;

pub trait ContentNodeQuery: Sized {
    /// Order by `tree_id` then `lft` - stable pre-order depth-first
    /// iteration, the canonical ordering for every consumer of the tree.
    fn tree_ordered(self) -> Self;

    /// One representative row per distinct `content_id`. Apply before
    /// `tree_ordered`; see [`QueryDialect::dedupe_by_content_id`].
    fn dedupe_by_content_id(self, dialect: &dyn QueryDialect) -> Self;

    /// Keep nodes whose `content_id` is in `ids`.
    fn filter_by_content_ids(
        self,
        dialect: &dyn QueryDialect,
        ids: &[String],
        validate: bool,
    ) -> Self;

    /// Drop nodes whose `content_id` is in `ids`.
    fn exclude_by_content_ids(
        self,
        dialect: &dyn QueryDialect,
        ids: &[String],
        validate: bool,
    ) -> Self;
}

impl ContentNodeQuery for Select<content_node::Entity> {
    fn tree_ordered(self) -> Self {
        self.order_by_asc(content_node::Column::TreeId)
            .order_by_asc(content_node::Column::Lft)
    }

    fn dedupe_by_content_id(self, dialect: &dyn QueryDialect) -> Self {
        dialect.dedupe_by_content_id(self)
    }

    fn filter_by_content_ids(
        self,
        dialect: &dyn QueryDialect,
        ids: &[String],
        validate: bool,
    ) -> Self {
        self.by_uuids(dialect, content_node::Column::ContentId, ids, validate, true)
    }

    fn exclude_by_content_ids(
        self,
        dialect: &dyn QueryDialect,
        ids: &[String],
        validate: bool,
    ) -> Self {
        self.by_uuids(dialect, content_node::Column::ContentId, ids, validate, false)
    }
}

/// `content_id`s of every non-topic node inside the node's `[lft, rght]`
/// interval. The interval is inclusive, so a non-topic node yields its own
/// content_id. Duplicates are kept; dedupe is a separate, explicit call.
pub async fn descendant_content_ids<C: ConnectionTrait>(
    db: &C,
    node: &content_node::Model,
) -> Result<Vec<String>, DbErr> {
    content_node::Entity::find()
        .select_only()
        .column(content_node::Column::ContentId)
        .filter(content_node::Column::TreeId.eq(node.tree_id))
        .filter(content_node::Column::Lft.gte(node.lft))
        .filter(content_node::Column::Lft.lte(node.rght))
        .filter(content_node::Column::Kind.ne(content_kinds::TOPIC))
        .into_tuple::<String>()
        .all(db)
        .await
}

/// Strict descendants: inside the interval, self excluded.
pub fn descendants_of(node: &content_node::Model) -> Condition {
    Condition::all()
        .add(content_node::Column::TreeId.eq(node.tree_id))
        .add(content_node::Column::Lft.gt(node.lft))
        .add(content_node::Column::Lft.lt(node.rght))
}

/// Same parent (or both roots), self excluded.
pub fn siblings_of(node: &content_node::Model) -> Condition {
    let same_parent = match &node.parent_id {
        Some(parent_id) => content_node::Column::ParentId.eq(parent_id.as_str()),
        None => content_node::Column::ParentId.is_null(),
    };
    Condition::all()
        .add(same_parent)
        .add(content_node::Column::Id.ne(node.id.as_str()))
}
