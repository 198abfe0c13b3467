use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

const CORS_MAX_AGE: Duration = Duration::from_secs(300);

/// Build the axum router with all Sketchbin endpoints.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(CORS_MAX_AGE);
    let body_limit = DefaultBodyLimit::max(state.config.max_payload_size);

    Router::new()
        .route("/ping", get(handler::ping))
        .route("/api/v2/post", post(handler::create_document))
        .route("/api/v2/post/", post(handler::create_document))
        .route("/api/v2/admin/documents", get(handler::list_documents))
        .route(
            "/api/v2/admin/documents/:id/name",
            post(handler::set_document_name),
        )
        .route(
            "/api/v2/admin/documents/:id/meta",
            post(handler::set_document_meta),
        )
        .route(
            "/api/v2/:id",
            get(handler::get_document).delete(handler::delete_document),
        )
        .route(
            "/api/v2/:id/",
            get(handler::get_document).delete(handler::delete_document),
        )
        .route(
            "/v1/projects/:project/databases/:database/:action",
            post(handler::docdb_action),
        )
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
