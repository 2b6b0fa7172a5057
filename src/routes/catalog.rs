//! Catalog routes: list, refresh, upload, delete.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use serde::Serialize;

use super::error_response;
use crate::backend::{CatalogError, UploadRequest};
use crate::catalog::{CatalogId, CatalogItem};
use crate::registry::InstanceId;
use crate::services::board::BoardError;
use crate::services::catalog;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DeleteCatalogItemResponse {
    pub catalog_id: CatalogId,
    pub evicted: Vec<InstanceId>,
}

/// `GET /api/catalog`: cached catalog entries.
pub async fn list_catalog(State(state): State<AppState>) -> Json<Vec<CatalogItem>> {
    Json(state.board.lock().await.catalog().items().to_vec())
}

/// `POST /api/catalog/refresh`: reload the cache from the backend.
pub async fn refresh_catalog(State(state): State<AppState>) -> Result<Json<Vec<CatalogItem>>, Response> {
    catalog::refresh(&state)
        .await
        .map(Json)
        .map_err(|e| error_response(&e))
}

/// `POST /api/catalog/upload`: multipart `video` + `clip_name`.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CatalogItem>), Response> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| malformed(&e))? {
        match field.name() {
            Some("video") => {
                form.file_name = field.file_name().map(str::to_owned);
                form.content_type = field.content_type().map(str::to_owned);
                form.media = Some(field.bytes().await.map_err(|e| malformed(&e))?.to_vec());
            }
            Some("clip_name") => {
                form.clip_name = Some(field.text().await.map_err(|e| malformed(&e))?);
            }
            _ => {}
        }
    }

    let item = catalog::upload(&state, form.into_request())
        .await
        .map_err(|e| error_response(&e))?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `DELETE /api/catalog/:id`: delete an entry and every tile showing it.
pub async fn delete_catalog_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteCatalogItemResponse>, Response> {
    let catalog_id = CatalogId::new(id);
    let evicted = catalog::delete_item(&state, catalog_id.clone())
        .await
        .map_err(|e| error_response(&e))?;
    Ok(Json(DeleteCatalogItemResponse { catalog_id, evicted }))
}

/// Multipart fields collected so far. Missing fields become empty values and
/// are rejected by upload validation.
#[derive(Debug, Default)]
struct UploadForm {
    clip_name: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    media: Option<Vec<u8>>,
}

impl UploadForm {
    fn into_request(self) -> UploadRequest {
        UploadRequest {
            display_name: self.clip_name.unwrap_or_default(),
            file_name: self.file_name.unwrap_or_default(),
            content_type: self.content_type,
            media: self.media.unwrap_or_default(),
        }
    }
}

fn malformed(err: &impl std::fmt::Display) -> Response {
    error_response(&BoardError::Catalog(CatalogError::Validation(format!("malformed upload: {err}"))))
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
