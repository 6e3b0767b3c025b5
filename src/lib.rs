//! Drop Server
//!
//! A minimal HTTP file drop: clients upload one file per multipart request
//! and fetch it back later by the name the server assigned.
//!
//! # Modules
//!
//! - `storage`: Stored name generation and the flat on-disk store
//! - `routes`: Upload, retrieval and health endpoints
//! - `middleware`: Request logging stage

pub mod config;
pub mod error;
pub mod middleware;
pub mod network;
pub mod routes;
pub mod state;
pub mod storage;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use state::AppState;

/// Build the application router.
///
/// Every request passes the logging stage before it is routed to a handler.
pub fn app(state: AppState) -> Router {
    let max_upload_bytes = state.config().storage.max_upload_bytes;
    let storage_root = state.store().root().to_path_buf();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/health", routes::health::router())
        .merge(routes::upload::router())
        .merge(routes::files::router(&storage_root))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(axum::middleware::from_fn(middleware::log_request))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
