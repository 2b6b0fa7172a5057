//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! The placement engine and tile registry are not safe to interleave, so the
//! whole board sits behind one mutex and every mutation runs to completion
//! under it. Catalog network calls happen outside the lock. Snapshots are
//! fanned out to WebSocket clients through a broadcast channel.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};

use crate::backend::CatalogBackend;
use crate::services::board::{BoardController, BoardSnapshot};

const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub board: Arc<Mutex<BoardController>>,
    pub catalog: Arc<dyn CatalogBackend>,
    pub snapshots: broadcast::Sender<BoardSnapshot>,
}

impl AppState {
    #[must_use]
    pub fn new(board: BoardController, catalog: Arc<dyn CatalogBackend>) -> Self {
        let (snapshots, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self { board: Arc::new(Mutex::new(board)), catalog, snapshots }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
