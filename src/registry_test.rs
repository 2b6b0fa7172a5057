use super::*;

fn cache_with(ids: &[&str]) -> CatalogCache {
    let mut cache = CatalogCache::new();
    cache.load(
        ids.iter()
            .map(|id| CatalogItem {
                catalog_id: CatalogId::new(*id),
                display_name: format!("clip {id}"),
                media_ref: format!("http://media/{id}"),
            })
            .collect(),
    );
    cache
}

#[test]
fn create_assigns_increasing_ids() {
    let mut registry = TileRegistry::new();
    let a = registry.create(CatalogId::new("1"));
    let b = registry.create(CatalogId::new("2"));
    assert!(b > a);
    assert_eq!(registry.len(), 2);
}

#[test]
fn duplicates_get_distinct_ids() {
    let mut registry = TileRegistry::new();
    let a = registry.create(CatalogId::new("1"));
    let b = registry.create(CatalogId::new("1"));
    assert_ne!(a, b);
    assert_eq!(registry.referencing(&CatalogId::new("1")), vec![a, b]);
}

#[test]
fn ids_are_never_reused_after_destroy() {
    let mut registry = TileRegistry::new();
    let a = registry.create(CatalogId::new("1"));
    assert!(registry.destroy(a));
    let b = registry.create(CatalogId::new("1"));
    assert_ne!(a, b);
}

#[test]
fn destroy_is_idempotent() {
    let mut registry = TileRegistry::new();
    let a = registry.create(CatalogId::new("1"));
    assert!(registry.destroy(a));
    assert!(!registry.destroy(a));
    assert!(registry.is_empty());
}

#[test]
fn resolve_reads_through_cache() {
    let cache = cache_with(&["1"]);
    let mut registry = TileRegistry::new();
    let a = registry.create(CatalogId::new("1"));
    let item = registry.resolve(a, &cache).unwrap();
    assert_eq!(item.display_name, "clip 1");
}

#[test]
fn resolve_sees_refreshed_entry() {
    let mut cache = cache_with(&["1"]);
    let mut registry = TileRegistry::new();
    let a = registry.create(CatalogId::new("1"));

    cache.append(CatalogItem {
        catalog_id: CatalogId::new("1"),
        display_name: "renamed".into(),
        media_ref: "http://media/1".into(),
    });
    assert_eq!(registry.resolve(a, &cache).unwrap().display_name, "renamed");
}

#[test]
fn resolve_unknown_instance_is_dangling() {
    let cache = cache_with(&["1"]);
    let registry = TileRegistry::new();
    let err = registry.resolve(InstanceId::new(42), &cache).unwrap_err();
    assert!(matches!(err, RegistryError::UnknownInstance(id) if id.get() == 42));
}

#[test]
fn resolve_missing_catalog_item_is_dangling() {
    let cache = cache_with(&[]);
    let mut registry = TileRegistry::new();
    let a = registry.create(CatalogId::new("gone"));
    let err = registry.resolve(a, &cache).unwrap_err();
    assert!(matches!(err, RegistryError::MissingCatalogItem { .. }));
    assert_eq!(crate::error::ErrorCode::error_code(&err), "E_DANGLING_REFERENCE");
}

#[test]
fn instances_lists_live_pairs() {
    let mut registry = TileRegistry::new();
    let a = registry.create(CatalogId::new("1"));
    let b = registry.create(CatalogId::new("2"));
    registry.destroy(a);
    let live: Vec<TileInstance> = registry.instances().collect();
    assert_eq!(live, vec![TileInstance { instance_id: b, catalog_id: CatalogId::new("2") }]);
}
