//! Shared test fixtures.

use sea_orm::{DatabaseConnection, Set};
use uuid::Uuid;

use crate::db::entities::{content_node, file, local_file};

pub async fn test_db() -> DatabaseConnection {
    crate::db::init_database("sqlite::memory:")
        .await
        .expect("in-memory database")
}

/// Fresh 32-char hex identifier, the storage format for all ids.
pub fn hex_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Available content node with generated ids; callers override fields
/// (content_id, parent_id, ...) before inserting.
pub fn node_row(
    title: &str,
    kind: &str,
    tree_id: i32,
    lft: i64,
    rght: i64,
) -> content_node::ActiveModel {
    content_node::ActiveModel {
        id: Set(hex_id()),
        parent_id: Set(None),
        channel_id: Set(hex_id()),
        content_id: Set(hex_id()),
        title: Set(title.to_string()),
        description: Set(None),
        kind: Set(kind.to_string()),
        available: Set(true),
        lft: Set(lft),
        rght: Set(rght),
        tree_id: Set(tree_id),
        level: Set(0),
        coach_content: Set(false),
        num_coach_contents: Set(0),
        on_device_resources: Set(1),
    }
}

/// Available local file with an mp4 extension.
pub fn local_file_row(id: &str) -> local_file::ActiveModel {
    local_file::ActiveModel {
        id: Set(id.to_string()),
        extension: Set("mp4".to_string()),
        available: Set(true),
        file_size: Set(Some(1024)),
    }
}

/// File record joining a node to a local file.
pub fn file_row(contentnode_id: &str, local_file_id: &str) -> file::ActiveModel {
    file::ActiveModel {
        id: Set(hex_id()),
        contentnode_id: Set(contentnode_id.to_string()),
        local_file_id: Set(local_file_id.to_string()),
        preset: Set("high_res_video".to_string()),
        lang_id: Set(None),
        supplementary: Set(false),
        thumbnail: Set(false),
        priority: Set(Some(1)),
    }
}
