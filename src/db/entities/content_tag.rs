//! Content tag entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "content_tag")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub tag_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::node_tag::Entity")]
    NodeTags,
}

impl Related<super::content_node::Entity> for Entity {
    fn to() -> RelationDef {
        super::node_tag::Relation::Node.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::node_tag::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
