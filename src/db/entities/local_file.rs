//! Local file entity - the on-disk state of a content blob, addressed by
//! content hash. Shared by any number of files across nodes; eligible for
//! deletion only once no available node references it.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "local_file")]
pub struct Model {
    /// Content hash (32 lowercase hex chars).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub extension: String,
    /// Whether the blob currently exists on local storage.
    pub available: bool,
    pub file_size: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::file::Entity")]
    Files,
}

impl Related<super::file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Files.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
