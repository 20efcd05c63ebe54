//! Content node entity - one item (topic or leaf) in the catalog tree.
//!
//! Tree structure is stored as a nested-set encoding (`lft`, `rght`,
//! `tree_id`, `level`): a node's descendants are exactly the rows with the
//! same `tree_id` whose `lft` falls inside the node's `[lft, rght]` interval.
//! The import pipeline maintains this encoding; nothing here rewrites it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// serde defaults let partial create/PATCH bodies deserialize; absent
// fields end up NotSet in the ActiveModel.
#[derive(Clone, Debug, Default, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(default)]
#[sea_orm(table_name = "content_node")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub parent_id: Option<String>,
    pub channel_id: String,
    /// Non-unique logical identifier; duplicate imports of the same logical
    /// content item share a content_id while keeping distinct `id`s.
    pub content_id: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: String,
    pub available: bool,
    pub lft: i64,
    pub rght: i64,
    pub tree_id: i32,
    pub level: i32,
    pub coach_content: bool,
    /// Coach-only resources under this node, recomputed by annotation.
    pub num_coach_contents: i32,
    /// Locally available resources under this node; 0/1 for leaves.
    pub on_device_resources: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id"
    )]
    Parent,
    #[sea_orm(has_many = "super::file::Entity")]
    Files,
    #[sea_orm(has_many = "super::assessment_metadata::Entity")]
    AssessmentMetadata,
}

impl Related<super::file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Files.def()
    }
}

impl Related<super::assessment_metadata::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssessmentMetadata.def()
    }
}

impl Related<super::content_tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::node_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::node_tag::Relation::Node.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
