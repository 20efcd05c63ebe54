//! Symmetric "related content" edges between content nodes.
//!
//! Edges may be stored in either direction; queries check both.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "node_related")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub node_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub related_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::content_node::Entity",
        from = "Column::NodeId",
        to = "super::content_node::Column::Id"
    )]
    Node,
    #[sea_orm(
        belongs_to = "super::content_node::Entity",
        from = "Column::RelatedId",
        to = "super::content_node::Column::Id"
    )]
    Related,
}

impl ActiveModelBehavior for ActiveModel {}
