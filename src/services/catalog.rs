//! Catalog service: executes board effects against the catalog backend.
//!
//! DESIGN
//! ======
//! Effects run with the board lock released, so tile edits keep flowing
//! while a load or upload is in flight. Each completion re-enters the board
//! through `board::mutate`. Catalog completions only touch the catalog cache
//! (plus the cascade eviction of tiles whose entry vanished), so their
//! interleaving with tile edits is harmless. Failures become the board's
//! notice and are returned to the caller; nothing is retried.

use tracing::{info, warn};

use crate::backend::{CatalogError, UploadRequest};
use crate::catalog::{CatalogId, CatalogItem};
use crate::registry::InstanceId;
use crate::services::board::{self, BoardAction, BoardError, Effect};
use crate::state::AppState;

/// What a completed effect produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectOutcome {
    CatalogLoaded { items: Vec<CatalogItem>, evicted: Vec<InstanceId> },
    Uploaded(CatalogItem),
    Deleted { catalog_id: CatalogId, evicted: Vec<InstanceId> },
}

/// Perform one effect and feed its completion back into the board.
///
/// # Errors
///
/// Returns `BoardError::Catalog` if the backend call fails.
pub async fn run_effect(state: &AppState, effect: Effect) -> Result<EffectOutcome, BoardError> {
    match effect {
        Effect::FetchCatalog { known } => {
            let items = report_failure(state, state.catalog.list().await).await?;
            let (evicted, _) = board::mutate(state, |b| Ok(b.catalog_loaded(items.clone(), &known))).await?;
            info!(count = items.len(), evicted = evicted.len(), "catalog loaded");
            Ok(EffectOutcome::CatalogLoaded { items, evicted })
        }
        Effect::Upload(request) => {
            let item = report_failure(state, state.catalog.upload(&request).await).await?;
            board::mutate(state, |b| {
                b.upload_completed(item.clone());
                Ok(())
            })
            .await?;
            info!(catalog_id = %item.catalog_id, name = %item.display_name, "upload cataloged");
            Ok(EffectOutcome::Uploaded(item))
        }
        Effect::DeleteCatalogItem(catalog_id) => {
            report_failure(state, state.catalog.delete(&catalog_id).await).await?;
            let (evicted, _) = board::mutate(state, |b| Ok(b.catalog_item_deleted(&catalog_id))).await?;
            Ok(EffectOutcome::Deleted { catalog_id, evicted })
        }
    }
}

/// Run effects in order, stopping at the first failure.
///
/// # Errors
///
/// See [`run_effect`].
pub async fn run_effects(state: &AppState, effects: Vec<Effect>) -> Result<Vec<EffectOutcome>, BoardError> {
    let mut outcomes = Vec::with_capacity(effects.len());
    for effect in effects {
        outcomes.push(run_effect(state, effect).await?);
    }
    Ok(outcomes)
}

/// Dispatch an action and carry out whatever network work it asks for.
///
/// # Errors
///
/// Returns the dispatch error or the first effect failure.
pub async fn perform(state: &AppState, action: BoardAction) -> Result<Vec<EffectOutcome>, BoardError> {
    let (effects, _) = board::dispatch(state, action).await?;
    run_effects(state, effects).await
}

/// Reload the catalog cache from the backend.
///
/// # Errors
///
/// Returns `BoardError::Catalog` on transport failure; the cache is unchanged.
pub async fn refresh(state: &AppState) -> Result<Vec<CatalogItem>, BoardError> {
    let outcomes = perform(state, BoardAction::RefreshCatalog).await?;
    Ok(outcomes
        .into_iter()
        .find_map(|outcome| match outcome {
            EffectOutcome::CatalogLoaded { items, .. } => Some(items),
            _ => None,
        })
        .unwrap_or_default())
}

/// Validate and upload a media file, appending the new entry to the cache.
///
/// # Errors
///
/// Returns a validation error before any network call, or a transport error
/// if the backend rejects the upload.
pub async fn upload(state: &AppState, request: UploadRequest) -> Result<CatalogItem, BoardError> {
    let outcomes = perform(state, BoardAction::RequestUpload(request)).await?;
    outcomes
        .into_iter()
        .find_map(|outcome| match outcome {
            EffectOutcome::Uploaded(item) => Some(item),
            _ => None,
        })
        .ok_or_else(|| CatalogError::Parse("upload produced no catalog entry".into()).into())
}

/// Delete a catalog entry and evict every tile that shows it.
///
/// # Errors
///
/// Returns `UnknownCatalogItem` if the entry is not cached, or a transport
/// error if the backend refuses the delete.
pub async fn delete_item(state: &AppState, catalog_id: CatalogId) -> Result<Vec<InstanceId>, BoardError> {
    let outcomes = perform(state, BoardAction::DeleteCatalogItem { catalog_id }).await?;
    Ok(outcomes
        .into_iter()
        .find_map(|outcome| match outcome {
            EffectOutcome::Deleted { evicted, .. } => Some(evicted),
            _ => None,
        })
        .unwrap_or_default())
}

async fn report_failure<T>(state: &AppState, result: Result<T, CatalogError>) -> Result<T, BoardError> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(error = %err, "catalog request failed");
            board::mutate(state, |b| {
                b.catalog_request_failed(&err);
                Ok(())
            })
            .await?;
            Err(err.into())
        }
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
