//! File entity - one deliverable asset (a specific format preset) of a
//! content node, backed by a shared local file.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "file")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub contentnode_id: String,
    pub local_file_id: String,
    pub preset: String,
    pub lang_id: Option<String>,
    pub supplementary: bool,
    pub thumbnail: bool,
    /// Ordering among sibling files of the same node.
    pub priority: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::content_node::Entity",
        from = "Column::ContentnodeId",
        to = "super::content_node::Column::Id"
    )]
    ContentNode,
    #[sea_orm(
        belongs_to = "super::local_file::Entity",
        from = "Column::LocalFileId",
        to = "super::local_file::Column::Id"
    )]
    LocalFile,
    #[sea_orm(
        belongs_to = "super::language::Entity",
        from = "Column::LangId",
        to = "super::language::Column::Id"
    )]
    Language,
}

impl Related<super::content_node::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContentNode.def()
    }
}

impl Related<super::local_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LocalFile.def()
    }
}

impl Related<super::language::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Language.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
