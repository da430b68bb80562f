use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use popt_sdk::Optimizer;
use tower_http::trace::TraceLayer;

use crate::handler;

/// Shared state handed to every handler.
pub type AppState = Arc<Optimizer>;

/// Large enough for a full history export.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Build the axum router with all endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health))
        .route("/v1/info", get(handler::info))
        .route("/v1/history", get(handler::list_history))
        .route("/v1/history/export", get(handler::export_history))
        .route("/v1/history/import", post(handler::import_history))
        .route(
            "/v1/history/:id",
            get(handler::get_entry)
                .put(handler::put_entry)
                .delete(handler::delete_entry),
        )
        .route("/v1/history/:id/compare", get(handler::compare))
        .route(
            "/v1/templates",
            get(handler::list_templates).post(handler::create_template),
        )
        .route(
            "/v1/templates/:id",
            get(handler::get_template)
                .put(handler::put_template)
                .delete(handler::delete_template),
        )
        .route("/v1/optimize", post(handler::optimize))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
