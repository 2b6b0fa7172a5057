//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the HTTP and websocket endpoints the presentation
//! surface talks to. Board routes mutate the shared board and answer with
//! the fresh snapshot; catalog routes drive the backend through the catalog
//! service; the websocket pushes every new snapshot.

pub mod board;
pub mod catalog;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ErrorCode;
use crate::services::board::BoardError;
use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/board", get(board::get_board))
        .route("/api/board/tiles", post(board::add_tile))
        .route("/api/board/tiles/{instance_id}", delete(board::remove_tile))
        .route("/api/board/layout", put(board::apply_layout))
        .route("/api/board/mute", post(board::toggle_mute))
        .route("/api/board/delete-mode", post(board::toggle_delete_mode))
        .route("/api/board/notice", delete(board::dismiss_notice))
        .route("/api/catalog", get(catalog::list_catalog))
        .route("/api/catalog/refresh", post(catalog::refresh_catalog))
        .route("/api/catalog/upload", post(catalog::upload))
        .route("/api/catalog/{id}", delete(catalog::delete_catalog_item))
        .route("/api/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// ERRORS
// =============================================================================

pub(crate) fn board_error_to_status(err: &BoardError) -> StatusCode {
    match err {
        BoardError::UnknownCatalogItem(_) => StatusCode::NOT_FOUND,
        BoardError::Registry(_) | BoardError::Placement(_) => StatusCode::INTERNAL_SERVER_ERROR,
        BoardError::Catalog(e) => match e {
            crate::backend::CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        },
    }
}

/// JSON error body: `{ code, message, retryable }`.
pub(crate) fn error_response(err: &BoardError) -> Response {
    let status = board_error_to_status(err);
    if status.is_server_error() {
        tracing::warn!(error = %err, code = err.error_code(), "request failed");
    }
    let body = serde_json::json!({
        "code": err.error_code(),
        "message": err.to_string(),
        "retryable": err.retryable(),
    });
    (status, Json(body)).into_response()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
