//! Unused and orphaned local-file cleanup.
//!
//! A local file is "unused" when it is still marked available but no file
//! record belonging to an available content node references it. Disk
//! removal failures are soft: each file reports a success flag and the
//! batch continues.

use sea_orm::sea_query::{Expr, Query, SelectStatement};
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use tokio::fs;

use crate::db::entities::{content_node, file, local_file};

use super::paths::{content_file_name, ContentStorage};

/// Outcome of one disk removal attempt.
pub struct FileDeletion {
    pub deleted: bool,
    pub file: local_file::Model,
}

fn referenced_by_available_node() -> SelectStatement {
    Query::select()
        .column((file::Entity, file::Column::LocalFileId))
        .from(file::Entity)
        .inner_join(
            content_node::Entity,
            Expr::col((file::Entity, file::Column::ContentnodeId))
                .equals((content_node::Entity, content_node::Column::Id)),
        )
        .and_where(Expr::col((content_node::Entity, content_node::Column::Available)).eq(true))
        .to_owned()
}

fn unused_condition() -> Condition {
    Condition::all()
        .add(local_file::Column::Available.eq(true))
        .add(local_file::Column::Id.not_in_subquery(referenced_by_available_node()))
}

fn referenced_at_all() -> SelectStatement {
    Query::select()
        .column(file::Column::LocalFileId)
        .from(file::Entity)
        .to_owned()
}

pub async fn unused_files<C: ConnectionTrait>(db: &C) -> Result<Vec<local_file::Model>, DbErr> {
    local_file::Entity::find()
        .filter(unused_condition())
        .all(db)
        .await
}

/// Remove every unused blob from disk, then mark the whole unused set
/// unavailable. Returns a per-file deletion flag; a file that was already
/// gone, had an invalid stored name, or hit an I/O error reports
/// `deleted: false` without aborting the batch.
pub async fn delete_unused_files<C: ConnectionTrait>(
    db: &C,
    storage: &ContentStorage,
) -> Result<Vec<FileDeletion>, DbErr> {
    let files = unused_files(db).await?;
    let mut results = Vec::with_capacity(files.len());
    for local in files {
        let deleted = match storage.storage_path(&content_file_name(&local)) {
            Ok(path) => fs::remove_file(&path).await.is_ok(),
            Err(e) => {
                tracing::warn!("skipping local file {}: {}", local.id, e);
                false
            }
        };
        results.push(FileDeletion {
            deleted,
            file: local,
        });
    }

    local_file::Entity::update_many()
        .col_expr(local_file::Column::Available, Expr::value(false))
        .filter(unused_condition())
        .exec(db)
        .await?;

    Ok(results)
}

/// Delete orphaned local-file rows. Returns the number of rows removed.
pub async fn delete_orphan_file_objects<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    let result = local_file::Entity::delete_many()
        .filter(local_file::Column::Id.not_in_subquery(referenced_at_all()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
