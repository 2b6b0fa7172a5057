//! Board controller: user actions over the registry, engine, and catalog.
//!
//! DESIGN
//! ======
//! `BoardController` owns every piece of board state: the catalog cache,
//! the tile registry, the placement engine, and the global display toggles.
//! Each user action runs to completion against it and either returns a list
//! of `Effect`s (network work for the caller to perform) or an error that
//! aborts only that action.
//!
//! Tiles move `absent -> placed -> absent`. Add registers the instance and
//! places it in one step, rolling the registration back if placement fails.
//! Remove drops the placement first, then the registration, so no snapshot
//! ever carries a record for a destroyed instance.
//!
//! The async helpers at the bottom take the `AppState` mutex, run one
//! mutation, publish the resulting snapshot, and release the lock before any
//! network call happens.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::backend::{CatalogError, UploadRequest};
use crate::catalog::{CatalogCache, CatalogId, CatalogItem};
use crate::error::ErrorCode;
use crate::grid::{GridConfig, PlacementEngine, PlacementError, Row};
use crate::registry::{InstanceId, RegistryError, TileRegistry};
use crate::state::AppState;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("unknown catalog item: {0}")]
    UnknownCatalogItem(CatalogId),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl ErrorCode for BoardError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCatalogItem(_) => "E_UNKNOWN_CATALOG_ITEM",
            Self::Registry(e) => e.error_code(),
            Self::Placement(e) => e.error_code(),
            Self::Catalog(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Catalog(e) => e.retryable(),
            _ => false,
        }
    }
}

/// One entry of a drag/resize gesture as sent by the presentation surface.
/// A missing `y` asks for the tile to be dropped below everything else.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProposedPlacement {
    pub instance_id: InstanceId,
    pub x: u32,
    #[serde(default)]
    pub y: Option<u32>,
    pub width: u32,
    pub height: u32,
}

/// User intents. Upload carries raw media and is only built server-side.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardAction {
    AddToBoard { catalog_id: CatalogId },
    RemoveFromBoard { instance_id: InstanceId },
    ApplyLayoutGesture { layout: Vec<ProposedPlacement> },
    ToggleMuteAll,
    ToggleDeleteMode,
    DismissNotice,
    RefreshCatalog,
    DeleteCatalogItem { catalog_id: CatalogId },
    #[serde(skip)]
    RequestUpload(UploadRequest),
}

/// Network work requested by an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// `known` is the cached id set at request time.
    FetchCatalog { known: Vec<CatalogId> },
    Upload(UploadRequest),
    DeleteCatalogItem(CatalogId),
}

/// A placed tile joined with its catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileView {
    pub instance_id: InstanceId,
    pub catalog_id: CatalogId,
    pub display_name: String,
    pub media_ref: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Read-only, render-ready board state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub tiles: Vec<TileView>,
    pub muted_all: bool,
    pub delete_mode_active: bool,
    pub total_columns: u32,
    pub notice: Option<String>,
}

// =============================================================================
// CONTROLLER
// =============================================================================

#[derive(Debug)]
pub struct BoardController {
    catalog: CatalogCache,
    registry: TileRegistry,
    engine: PlacementEngine,
    muted_all: bool,
    delete_mode_active: bool,
    notice: Option<String>,
}

impl BoardController {
    #[must_use]
    pub fn new(grid: GridConfig, muted_all: bool) -> Self {
        Self {
            catalog: CatalogCache::new(),
            registry: TileRegistry::new(),
            engine: PlacementEngine::new(grid),
            muted_all,
            delete_mode_active: false,
            notice: None,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    #[must_use]
    pub fn registry(&self) -> &TileRegistry {
        &self.registry
    }

    #[must_use]
    pub fn engine(&self) -> &PlacementEngine {
        &self.engine
    }

    #[must_use]
    pub fn muted_all(&self) -> bool {
        self.muted_all
    }

    #[must_use]
    pub fn delete_mode_active(&self) -> bool {
        self.delete_mode_active
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Apply one user action.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying operation. State is unchanged on
    /// error apart from the user-visible notice.
    pub fn dispatch(&mut self, action: BoardAction) -> Result<Vec<Effect>, BoardError> {
        match action {
            BoardAction::AddToBoard { catalog_id } => {
                self.add_to_board(&catalog_id)?;
            }
            BoardAction::RemoveFromBoard { instance_id } => {
                self.remove_from_board(instance_id);
            }
            BoardAction::ApplyLayoutGesture { layout } => self.apply_layout_gesture(layout)?,
            BoardAction::ToggleMuteAll => {
                self.toggle_mute_all();
            }
            BoardAction::ToggleDeleteMode => {
                self.toggle_delete_mode();
            }
            BoardAction::DismissNotice => self.notice = None,
            BoardAction::RefreshCatalog => {
                return Ok(vec![Effect::FetchCatalog { known: self.catalog.ids() }]);
            }
            BoardAction::DeleteCatalogItem { catalog_id } => {
                if !self.catalog.contains(&catalog_id) {
                    return Err(BoardError::UnknownCatalogItem(catalog_id));
                }
                return Ok(vec![Effect::DeleteCatalogItem(catalog_id)]);
            }
            BoardAction::RequestUpload(request) => {
                if let Err(err) = request.validate() {
                    self.notice = Some(err.to_string());
                    return Err(err.into());
                }
                return Ok(vec![Effect::Upload(request)]);
            }
        }
        Ok(Vec::new())
    }

    // =========================================================================
    // TILE ACTIONS
    // =========================================================================

    /// Create an instance of `catalog_id` and auto-place it.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCatalogItem` if the catalog has no such entry, or
    /// `DuplicatePlacement` if the engine already tracks the fresh id.
    pub fn add_to_board(&mut self, catalog_id: &CatalogId) -> Result<InstanceId, BoardError> {
        if !self.catalog.contains(catalog_id) {
            return Err(BoardError::UnknownCatalogItem(catalog_id.clone()));
        }

        let instance_id = self.registry.create(catalog_id.clone());
        let record = self.engine.auto_placement(instance_id);
        if let Err(e) = self.engine.add_placement(record) {
            self.registry.destroy(instance_id);
            error!(error = %e, %instance_id, "placement invariant violated on add");
            return Err(e.into());
        }

        info!(%instance_id, %catalog_id, "tile added");
        Ok(instance_id)
    }

    /// Remove a tile. Returns `false` if it was already gone.
    pub fn remove_from_board(&mut self, instance_id: InstanceId) -> bool {
        let placed = self.engine.remove(instance_id);
        let live = self.registry.destroy(instance_id);
        if placed != live {
            error!(%instance_id, placed, live, "placement and registry disagreed on removal");
        }
        if placed || live {
            info!(%instance_id, "tile removed");
        } else {
            debug!(%instance_id, "remove of absent tile ignored");
        }
        placed || live
    }

    /// Accept a drag/resize result. Entries for instances that are no longer
    /// live are dropped; live tiles the gesture did not mention keep their
    /// current geometry.
    ///
    /// # Errors
    ///
    /// Returns `DuplicatePlacement` only if the engine's own records repeat an
    /// id, which the merge below never produces.
    pub fn apply_layout_gesture(&mut self, proposed: Vec<ProposedPlacement>) -> Result<(), BoardError> {
        let mut merged = self.engine.records().to_vec();
        let mut seen = HashSet::new();
        let mut stale = 0usize;

        for entry in proposed {
            if !seen.insert(entry.instance_id) {
                continue;
            }
            let target = merged
                .iter_mut()
                .find(|r| r.instance_id == entry.instance_id && self.registry.contains(entry.instance_id));
            match target {
                Some(record) => {
                    record.x = entry.x;
                    record.y = entry.y.map_or(Row::Unresolved, Row::At);
                    record.width = entry.width;
                    record.height = entry.height;
                }
                None => stale += 1,
            }
        }

        if stale > 0 {
            debug!(stale, "ignored layout entries for absent tiles");
        }
        self.engine.replace_layout(merged)?;
        Ok(())
    }

    /// Returns the new value.
    pub fn toggle_mute_all(&mut self) -> bool {
        self.muted_all = !self.muted_all;
        self.muted_all
    }

    /// Returns the new value.
    pub fn toggle_delete_mode(&mut self) -> bool {
        self.delete_mode_active = !self.delete_mode_active;
        self.delete_mode_active
    }

    // =========================================================================
    // CATALOG COMPLETIONS
    // =========================================================================

    /// Apply a catalog listing requested while `known` was cached, evicting
    /// tiles whose entry disappeared. Tiles of items uploaded while the
    /// listing was in flight are kept.
    pub fn catalog_loaded(&mut self, items: Vec<CatalogItem>, known: &[CatalogId]) -> Vec<InstanceId> {
        self.catalog.reconcile(items, known);
        self.notice = None;

        let orphans: Vec<InstanceId> = self
            .registry
            .instances()
            .filter(|tile| !self.catalog.contains(&tile.catalog_id))
            .map(|tile| tile.instance_id)
            .collect();
        for instance_id in &orphans {
            self.remove_from_board(*instance_id);
        }
        orphans
    }

    /// Make a freshly uploaded item available. It is not placed.
    pub fn upload_completed(&mut self, item: CatalogItem) {
        self.catalog.append(item);
        self.notice = None;
    }

    /// Drop a deleted catalog entry and every tile that shows it.
    pub fn catalog_item_deleted(&mut self, catalog_id: &CatalogId) -> Vec<InstanceId> {
        let evicted = self.registry.referencing(catalog_id);
        for instance_id in &evicted {
            self.remove_from_board(*instance_id);
        }
        self.catalog.evict(catalog_id);
        self.notice = None;
        info!(%catalog_id, evicted = evicted.len(), "catalog item deleted");
        evicted
    }

    pub fn catalog_request_failed(&mut self, err: &CatalogError) {
        self.notice = Some(err.to_string());
    }

    // =========================================================================
    // SNAPSHOT
    // =========================================================================

    /// Join placement records with their catalog entries, in board order.
    ///
    /// # Errors
    ///
    /// Returns a dangling-reference error if a record's instance or catalog
    /// entry cannot be resolved.
    pub fn snapshot(&self) -> Result<BoardSnapshot, BoardError> {
        let tiles = self
            .engine
            .records()
            .iter()
            .map(|record| {
                let item = self.registry.resolve(record.instance_id, &self.catalog)?;
                Ok(TileView {
                    instance_id: record.instance_id,
                    catalog_id: item.catalog_id.clone(),
                    display_name: item.display_name.clone(),
                    media_ref: item.media_ref.clone(),
                    x: record.x,
                    y: record.y.resolved().unwrap_or_default(),
                    width: record.width,
                    height: record.height,
                })
            })
            .collect::<Result<Vec<_>, RegistryError>>()?;

        Ok(BoardSnapshot {
            tiles,
            muted_all: self.muted_all,
            delete_mode_active: self.delete_mode_active,
            total_columns: self.engine.config().total_columns(),
            notice: self.notice.clone(),
        })
    }
}

// =============================================================================
// SHARED-STATE HELPERS
// =============================================================================

/// Run one mutation under the board lock and publish the resulting snapshot.
///
/// # Errors
///
/// Returns the mutation's error, or a snapshot error if the board no longer
/// resolves.
pub async fn mutate<T, F>(state: &AppState, f: F) -> Result<(T, BoardSnapshot), BoardError>
where
    F: FnOnce(&mut BoardController) -> Result<T, BoardError>,
{
    let mut board = state.board.lock().await;
    let result = f(&mut board);
    let snapshot = board.snapshot();
    drop(board);

    let snapshot = match snapshot {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!(error = %e, "board snapshot failed");
            result?;
            return Err(e);
        }
    };
    publish(state, &snapshot);
    result.map(|value| (value, snapshot))
}

/// Dispatch one action against the shared board.
///
/// # Errors
///
/// See [`BoardController::dispatch`].
pub async fn dispatch(state: &AppState, action: BoardAction) -> Result<(Vec<Effect>, BoardSnapshot), BoardError> {
    mutate(state, |board| board.dispatch(action)).await
}

/// Current snapshot without mutating.
///
/// # Errors
///
/// See [`BoardController::snapshot`].
pub async fn snapshot(state: &AppState) -> Result<BoardSnapshot, BoardError> {
    state.board.lock().await.snapshot()
}

fn publish(state: &AppState, snapshot: &BoardSnapshot) {
    // No subscribers is fine.
    let _ = state.snapshots.send(snapshot.clone());
}

#[cfg(test)]
#[path = "board_test.rs"]
mod tests;
