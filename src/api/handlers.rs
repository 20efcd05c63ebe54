//! REST request handlers for channels, content nodes and files.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, LoaderTrait,
    ModelTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::{json, Value};

use crate::cache::ContentCacheKey;
use crate::db::dialect::{dialect_for, QueryDialect};
use crate::db::entities::{channel_metadata, content_node, file, local_file};
use crate::error::{Result, ServerError};
use crate::query::{descendant_content_ids, ContentNodeQuery};
use crate::storage::{delete_orphan_file_objects, delete_unused_files, ContentStorage};

use super::filters::ContentNodeListParams;
use super::pagination::{paginate, Page, PageParams};
use super::serializers::{
    channel_responses, content_node_responses, file_response, ChannelResponse,
    ContentNodeResponse, FileResponse,
};

pub struct AppState {
    pub db: DatabaseConnection,
    pub dialect: &'static dyn QueryDialect,
    pub storage: ContentStorage,
    pub cache_key: ContentCacheKey,
}

impl AppState {
    pub fn new(db: DatabaseConnection, storage: ContentStorage) -> Self {
        let dialect = dialect_for(db.get_database_backend());
        tracing::info!("query dialect: {}", dialect.name());
        Self {
            db,
            dialect,
            storage,
            cache_key: ContentCacheKey::new(),
        }
    }
}

// Body-to-ActiveModel conversion failures are client errors, not database
// errors; absent fields stay NotSet so PATCH bodies may be partial.
fn channel_from_body(body: Value) -> Result<channel_metadata::ActiveModel> {
    channel_metadata::ActiveModel::from_json(body)
        .map_err(|e| ServerError::InvalidRequest(e.to_string()))
}

fn node_from_body(body: Value) -> Result<content_node::ActiveModel> {
    content_node::ActiveModel::from_json(body)
        .map_err(|e| ServerError::InvalidRequest(e.to_string()))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "cache_key": state.cache_key.get(),
    }))
}

// ============================================================================
// Channel handlers
// ============================================================================

pub async fn list_channels(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ChannelResponse>>> {
    let channels = channel_metadata::Entity::find()
        .order_by_asc(channel_metadata::Column::Position)
        .all(&state.db)
        .await?;
    Ok(Json(channel_responses(&state.db, channels).await?))
}

pub async fn get_channel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ChannelResponse>> {
    let channel = channel_metadata::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or(ServerError::ChannelNotFound(id))?;
    let mut responses = channel_responses(&state.db, vec![channel]).await?;
    Ok(Json(responses.remove(0)))
}

pub async fn create_channel(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Response> {
    let channel = channel_from_body(body)?.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(channel)).into_response())
}

pub async fn update_channel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<channel_metadata::Model>> {
    channel_metadata::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ServerError::ChannelNotFound(id.clone()))?;
    let mut active = channel_from_body(body)?;
    active.id = Set(id);
    Ok(Json(active.update(&state.db).await?))
}

/// Delete a channel: its whole content tree goes first (invalidating the
/// device cache key), then local files nothing references anymore, then the
/// channel record itself.
pub async fn delete_channel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let channel = channel_metadata::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or(ServerError::ChannelNotFound(id))?;

    let root = content_node::Entity::find_by_id(&channel.root_id)
        .one(&state.db)
        .await?;
    if let Some(root) = root {
        let resources = descendant_content_ids(&state.db, &root).await?;
        content_node::Entity::delete_many()
            .filter(content_node::Column::TreeId.eq(root.tree_id))
            .exec(&state.db)
            .await?;
        state.cache_key.update_cache_key();
        tracing::info!(
            "deleted content tree {} ({} resource references)",
            root.tree_id,
            resources.len()
        );
    }

    let results = delete_unused_files(&state.db, &state.storage).await?;
    let failed = results.iter().filter(|r| !r.deleted).count();
    if failed > 0 {
        tracing::warn!(
            "{} of {} stored files could not be removed",
            failed,
            results.len()
        );
    }
    delete_orphan_file_objects(&state.db).await?;

    channel.delete(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Content node handlers
// ============================================================================

pub async fn list_content_nodes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ContentNodeListParams>,
) -> Result<Json<Page<ContentNodeResponse>>> {
    let select = params
        .apply(&state.db, state.dialect, content_node::Entity::find())
        .await?
        .tree_ordered();
    let page = paginate(select, &state.db, params.page_params()).await?;

    let Page {
        count,
        total_pages,
        page,
        results,
    } = page;
    let results = content_node_responses(&state.db, &state.storage, results).await?;
    Ok(Json(Page {
        count,
        total_pages,
        page,
        results,
    }))
}

pub async fn get_content_node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ContentNodeResponse>> {
    let node = content_node::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or(ServerError::NodeNotFound(id))?;
    let mut responses = content_node_responses(&state.db, &state.storage, vec![node]).await?;
    Ok(Json(responses.remove(0)))
}

/// Create one node, or many when the body is an array.
pub async fn create_content_nodes(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Response> {
    match body {
        Value::Array(items) => {
            let mut created = Vec::with_capacity(items.len());
            for item in items {
                let node = node_from_body(item)?.insert(&state.db).await?;
                created.push(node);
            }
            Ok((StatusCode::CREATED, Json(created)).into_response())
        }
        item => {
            let node = node_from_body(item)?.insert(&state.db).await?;
            Ok((StatusCode::CREATED, Json(node)).into_response())
        }
    }
}

pub async fn update_content_node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<content_node::Model>> {
    content_node::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ServerError::NodeNotFound(id.clone()))?;
    let mut active = node_from_body(body)?;
    active.id = Set(id);
    Ok(Json(active.update(&state.db).await?))
}

pub async fn delete_content_node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let node = content_node::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or(ServerError::NodeNotFound(id))?;
    node.delete(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Destroy every node the filters match. Refused outright when no
/// recognized filter parameter is present - an unfiltered bulk destroy
/// would wipe the whole table.
pub async fn bulk_destroy_content_nodes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ContentNodeListParams>,
) -> Result<StatusCode> {
    if !params.has_filter() {
        return Err(ServerError::InvalidRequest(
            "bulk destroy requires a filter parameter".to_string(),
        ));
    }
    let nodes = params
        .apply(&state.db, state.dialect, content_node::Entity::find())
        .await?
        .all(&state.db)
        .await?;
    // One at a time, matching the single-destroy path.
    for node in nodes {
        node.delete(&state.db).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// File handlers
// ============================================================================

pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<FileResponse>>> {
    let select = file::Entity::find().order_by_asc(file::Column::Priority);
    let page = paginate(select, &state.db, params).await?;

    let nodes = page.results.load_one(content_node::Entity, &state.db).await?;
    let locals = page.results.load_one(local_file::Entity, &state.db).await?;
    let Page {
        count,
        total_pages,
        page,
        results,
    } = page;
    let results = results
        .into_iter()
        .zip(nodes)
        .zip(locals)
        .map(|((file, node), local)| {
            let title = node.map(|n| n.title).unwrap_or_default();
            file_response(file, local, &title, &state.storage)
        })
        .collect();
    Ok(Json(Page {
        count,
        total_pages,
        page,
        results,
    }))
}

pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FileResponse>> {
    let file = file::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or(ServerError::FileNotFound(id))?;
    let node = file
        .find_related(content_node::Entity)
        .one(&state.db)
        .await?;
    let local = file.find_related(local_file::Entity).one(&state.db).await?;
    let title = node.map(|n| n.title).unwrap_or_default();
    Ok(Json(file_response(file, local, &title, &state.storage)))
}

pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let file = file::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or(ServerError::FileNotFound(id))?;
    file.delete(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}
