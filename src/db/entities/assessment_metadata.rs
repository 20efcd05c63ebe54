//! Assessment metadata entity - extra fields for nodes that probe a
//! learner's knowledge (mastery practice, quizzes).

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "assessment_metadata")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub contentnode_id: String,
    /// JSON array of assessment item identifiers.
    pub assessment_item_ids: String,
    pub number_of_assessments: i32,
    /// JSON object describing the mastery criterion.
    pub mastery_model: String,
    pub randomize: bool,
    pub is_manipulable: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::content_node::Entity",
        from = "Column::ContentnodeId",
        to = "super::content_node::Column::Id"
    )]
    ContentNode,
}

impl Related<super::content_node::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContentNode.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
