//! HTTP catalog backend client.
//!
//! Thin reqwest wrapper over `GET /videos`, `POST /upload`, and
//! `DELETE /video/{id}`. Pure parsing in `parse_*` for testability.

use std::time::Duration;

use reqwest::multipart::{Form, Part};

use super::{CatalogBackend, CatalogError, UploadRequest};
use crate::catalog::{CatalogId, CatalogItem};
use crate::config::CatalogConfig;

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCatalogClient {
    /// # Errors
    ///
    /// Returns `HttpClientBuild` if the reqwest client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| CatalogError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait::async_trait]
impl CatalogBackend for HttpCatalogClient {
    async fn list(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        let response = self
            .http
            .get(self.url("/videos"))
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let (status, text) = read_response(response).await?;
        if !(200..300).contains(&status) {
            return Err(parse_error_body(status, &text));
        }
        parse_video_list(&text)
    }

    async fn upload(&self, request: &UploadRequest) -> Result<CatalogItem, CatalogError> {
        let mut part = Part::bytes(request.media.clone()).file_name(request.file_name.clone());
        if let Some(content_type) = &request.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| CatalogError::Validation(format!("invalid content type: {e}")))?;
        }
        let form = Form::new()
            .part("video", part)
            .text("clip_name", request.display_name.clone());

        let response = self
            .http
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let (status, text) = read_response(response).await?;
        parse_upload_response(status, &text)
    }

    async fn delete(&self, catalog_id: &CatalogId) -> Result<(), CatalogError> {
        let response = self
            .http
            .delete(self.url(&format!("/video/{catalog_id}")))
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let (status, text) = read_response(response).await?;
        if !(200..300).contains(&status) {
            return Err(parse_error_body(status, &text));
        }
        Ok(())
    }
}

async fn read_response(response: reqwest::Response) -> Result<(u16, String), CatalogError> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| CatalogError::Transport(e.to_string()))?;
    Ok((status, text))
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Backend ids are integers today; strings are accepted too.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum WireId {
    Int(i64),
    Str(String),
}

#[derive(serde::Deserialize)]
struct WireVideo {
    id: WireId,
    clip_name: String,
    url: String,
}

impl From<WireVideo> for CatalogItem {
    fn from(video: WireVideo) -> Self {
        let catalog_id = match video.id {
            WireId::Int(id) => CatalogId::new(id.to_string()),
            WireId::Str(id) => CatalogId::new(id),
        };
        Self { catalog_id, display_name: video.clip_name, media_ref: video.url }
    }
}

#[derive(serde::Deserialize)]
struct UploadAck {
    video: WireVideo,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    error: String,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_video_list(json: &str) -> Result<Vec<CatalogItem>, CatalogError> {
    let videos: Vec<WireVideo> = serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
    Ok(videos.into_iter().map(CatalogItem::from).collect())
}

fn parse_upload_response(status: u16, json: &str) -> Result<CatalogItem, CatalogError> {
    if !(200..300).contains(&status) {
        return Err(parse_error_body(status, json));
    }
    let ack: UploadAck = serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
    Ok(ack.video.into())
}

/// Non-2xx bodies carry `{ "error": ... }`; anything else is passed through raw.
fn parse_error_body(status: u16, body: &str) -> CatalogError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string());
    CatalogError::Rejected { status, message }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
