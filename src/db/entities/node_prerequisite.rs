//! Prerequisite edges between content nodes.
//!
//! A row `(node_id, prerequisite_id)` means `node_id` has `prerequisite_id`
//! as a prerequisite.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "node_prerequisite")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub node_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub prerequisite_id: String,
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
        from = "Column::PrerequisiteId",
        to = "super::content_node::Column::Id"
    )]
    Prerequisite,
}

impl ActiveModelBehavior for ActiveModel {}
