//! Catalog backend: the external media store the catalog cache mirrors.
//!
//! DESIGN
//! ======
//! The board core never talks HTTP. It consumes the backend through the
//! `CatalogBackend` trait so tests can swap in an in-memory fake; `http`
//! holds the reqwest implementation of the real endpoints.

pub mod http;

use crate::catalog::{CatalogId, CatalogItem};

/// File extensions the backend accepts for uploads.
pub const ALLOWED_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv"];

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The upload was rejected before any network call.
    #[error("invalid upload: {0}")]
    Validation(String),

    /// The request never produced a response.
    #[error("catalog request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("catalog backend rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The backend answered 2xx with a body we could not read.
    #[error("catalog response parse failed: {0}")]
    Parse(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for CatalogError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::Transport(_) | Self::Rejected { .. } => "E_TRANSPORT",
            Self::Parse(_) => "E_CATALOG_RESPONSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Rejected { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// UPLOAD REQUEST
// =============================================================================

/// A media file plus the display name to catalog it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub display_name: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub media: Vec<u8>,
}

impl UploadRequest {
    /// Client-side checks that mirror what the backend would reject.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the name, file, or extension is missing or
    /// not accepted.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.display_name.trim().is_empty() {
            return Err(CatalogError::Validation("clip name is required".into()));
        }
        if self.file_name.trim().is_empty() || self.media.is_empty() {
            return Err(CatalogError::Validation("video file is required".into()));
        }
        let extension = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(CatalogError::Validation(format!(
                "unsupported file type '{}' (expected one of {})",
                self.file_name,
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }
        Ok(())
    }
}

// =============================================================================
// BACKEND TRAIT
// =============================================================================

/// Async access to the catalog store. Enables mocking in tests.
#[async_trait::async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Fetch every catalog entry.
    async fn list(&self) -> Result<Vec<CatalogItem>, CatalogError>;

    /// Store a new media file and return its catalog entry.
    async fn upload(&self, request: &UploadRequest) -> Result<CatalogItem, CatalogError>;

    /// Delete a catalog entry.
    async fn delete(&self, catalog_id: &CatalogId) -> Result<(), CatalogError>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
