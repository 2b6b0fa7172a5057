use super::*;
use crate::backend::CatalogError;
use crate::catalog::CatalogId;
use crate::grid::PlacementError;
use crate::registry::{InstanceId, RegistryError};

#[test]
fn unknown_catalog_item_maps_to_not_found() {
    let err = BoardError::UnknownCatalogItem(CatalogId::new("1"));
    assert_eq!(board_error_to_status(&err), StatusCode::NOT_FOUND);
}

#[test]
fn validation_maps_to_bad_request() {
    let err = BoardError::Catalog(CatalogError::Validation("clip name is required".into()));
    assert_eq!(board_error_to_status(&err), StatusCode::BAD_REQUEST);
}

#[test]
fn transport_maps_to_bad_gateway() {
    let err = BoardError::Catalog(CatalogError::Transport("refused".into()));
    assert_eq!(board_error_to_status(&err), StatusCode::BAD_GATEWAY);
    let err = BoardError::Catalog(CatalogError::Rejected { status: 400, message: "bad".into() });
    assert_eq!(board_error_to_status(&err), StatusCode::BAD_GATEWAY);
}

#[test]
fn invariant_errors_map_to_internal() {
    let err = BoardError::Registry(RegistryError::UnknownInstance(InstanceId::new(1)));
    assert_eq!(board_error_to_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
    let err = BoardError::Placement(PlacementError::DuplicatePlacement(InstanceId::new(1)));
    assert_eq!(board_error_to_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn error_response_carries_status() {
    let err = BoardError::Catalog(CatalogError::Transport("refused".into()));
    let response = error_response(&err);
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn healthz_ok() {
    assert_eq!(healthz().await, StatusCode::OK);
}
