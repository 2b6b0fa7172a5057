//! Board routes: tile actions and display toggles.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use serde::{Deserialize, Serialize};

use super::error_response;
use crate::catalog::CatalogId;
use crate::registry::InstanceId;
use crate::services::board::{self, BoardAction, BoardSnapshot, ProposedPlacement};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AddTileBody {
    pub catalog_id: CatalogId,
}

#[derive(Debug, Serialize)]
pub struct AddTileResponse {
    pub instance_id: InstanceId,
    pub snapshot: BoardSnapshot,
}

#[derive(Debug, Serialize)]
pub struct RemoveTileResponse {
    pub removed: bool,
    pub snapshot: BoardSnapshot,
}

/// `GET /api/board`: current snapshot.
pub async fn get_board(State(state): State<AppState>) -> Result<Json<BoardSnapshot>, Response> {
    board::snapshot(&state).await.map(Json).map_err(|e| error_response(&e))
}

/// `POST /api/board/tiles`: place a new instance of a catalog item.
pub async fn add_tile(
    State(state): State<AppState>,
    Json(body): Json<AddTileBody>,
) -> Result<(StatusCode, Json<AddTileResponse>), Response> {
    let (instance_id, snapshot) = board::mutate(&state, |b| b.add_to_board(&body.catalog_id))
        .await
        .map_err(|e| error_response(&e))?;
    Ok((StatusCode::CREATED, Json(AddTileResponse { instance_id, snapshot })))
}

/// `DELETE /api/board/tiles/:instance_id`: remove a tile. Removing a tile
/// that is already gone still succeeds.
pub async fn remove_tile(
    State(state): State<AppState>,
    Path(instance_id): Path<InstanceId>,
) -> Result<Json<RemoveTileResponse>, Response> {
    let (removed, snapshot) = board::mutate(&state, |b| Ok(b.remove_from_board(instance_id)))
        .await
        .map_err(|e| error_response(&e))?;
    Ok(Json(RemoveTileResponse { removed, snapshot }))
}

/// `PUT /api/board/layout`: accept a drag/resize result.
pub async fn apply_layout(
    State(state): State<AppState>,
    Json(layout): Json<Vec<ProposedPlacement>>,
) -> Result<Json<BoardSnapshot>, Response> {
    run(&state, BoardAction::ApplyLayoutGesture { layout }).await
}

/// `POST /api/board/mute`
pub async fn toggle_mute(State(state): State<AppState>) -> Result<Json<BoardSnapshot>, Response> {
    run(&state, BoardAction::ToggleMuteAll).await
}

/// `POST /api/board/delete-mode`
pub async fn toggle_delete_mode(State(state): State<AppState>) -> Result<Json<BoardSnapshot>, Response> {
    run(&state, BoardAction::ToggleDeleteMode).await
}

/// `DELETE /api/board/notice`
pub async fn dismiss_notice(State(state): State<AppState>) -> Result<Json<BoardSnapshot>, Response> {
    run(&state, BoardAction::DismissNotice).await
}

async fn run(state: &AppState, action: BoardAction) -> Result<Json<BoardSnapshot>, Response> {
    let (_, snapshot) = board::dispatch(state, action)
        .await
        .map_err(|e| error_response(&e))?;
    Ok(Json(snapshot))
}

#[cfg(test)]
#[path = "board_test.rs"]
mod tests;
