//! REST API surface.

pub mod filters;
pub mod handlers;
pub mod pagination;
pub mod serializers;

use std::sync::Arc;

use axum::{routing::get, Router};

pub use handlers::AppState;

/// Build the catalog API router.
///
/// Content-node listing accepts the filter parameters `parent`, `search`,
/// `prerequisite_for`, `has_prerequisite`, `related`, `recommendations_for`
/// and `recommendations`, plus opt-in `page`/`page_size` pagination.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/channel",
            get(handlers::list_channels).post(handlers::create_channel),
        )
        .route(
            "/api/channel/:id",
            get(handlers::get_channel)
                .patch(handlers::update_channel)
                .delete(handlers::delete_channel),
        )
        .route(
            "/api/contentnode",
            get(handlers::list_content_nodes)
                .post(handlers::create_content_nodes)
                .delete(handlers::bulk_destroy_content_nodes),
        )
        .route(
            "/api/contentnode/:id",
            get(handlers::get_content_node)
                .patch(handlers::update_content_node)
                .delete(handlers::delete_content_node),
        )
        .route("/api/file", get(handlers::list_files))
        .route(
            "/api/file/:id",
            get(handlers::get_file).delete(handlers::delete_file),
        )
}
