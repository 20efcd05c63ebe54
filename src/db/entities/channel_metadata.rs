//! Channel metadata entity - describes one imported content collection.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// serde defaults let partial create/PATCH bodies deserialize; absent
// fields end up NotSet in the ActiveModel.
#[derive(Clone, Debug, Default, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(default)]
#[sea_orm(table_name = "channel_metadata")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub author: String,
    pub version: i32,
    pub thumbnail: Option<String>,
    /// Root node of the channel's content tree.
    pub root_id: String,
    pub last_updated: Option<String>,
    // Precalculated during annotation/migration.
    pub published_size: i64,
    pub total_resource_count: i32,
    pub position: i32,
    pub public: Option<bool>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::channel_language::Entity")]
    ChannelLanguages,
}

impl Related<super::channel_language::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChannelLanguages.def()
    }
}

impl Related<super::language::Entity> for Entity {
    fn to() -> RelationDef {
        super::channel_language::Relation::Language.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::channel_language::Relation::Channel.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
