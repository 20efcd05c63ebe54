mod api;
mod cache;
mod db;
mod error;
mod presets;
mod query;
mod storage;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::AppState;
use storage::ContentStorage;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "content_catalog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Content blobs live here; the default database sits alongside them
    let storage_path = std::env::var("CONTENT_STORAGE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir().join("content-catalog-storage"));
    std::fs::create_dir_all(&storage_path).ok();

    let db_url = std::env::var("CONTENT_DB_URL").unwrap_or_else(|_| {
        format!(
            "sqlite:{}?mode=rwc",
            storage_path.join("catalog.db").display()
        )
    });

    let db = db::init_database(&db_url)
        .await
        .expect("Failed to initialize database");

    let state = Arc::new(AppState::new(db, ContentStorage::new(storage_path)));

    let app = api::api_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = std::env::var("CONTENT_BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()
        .expect("Invalid CONTENT_BIND_ADDR");

    tracing::info!("Content catalog server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app).await.expect("Server error");
}
