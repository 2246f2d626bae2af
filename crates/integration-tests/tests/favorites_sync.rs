//! Favorites synchronization against the in-memory ordering service.

use chopwell_client::favorites::{FavoritesStore, FavoritesSyncEngine};
use chopwell_core::DishId;
use chopwell_integration_tests::{Endpoint, FakeBackend};

#[tokio::test]
async fn test_toggle_round_trip() {
    let backend = FakeBackend::new();
    let engine = FavoritesSyncEngine::new(&backend, FavoritesStore::new());

    engine.toggle(&DishId::new("dishA")).await.unwrap();
    assert!(engine.store().contains(&DishId::new("dishA")));

    engine.toggle(&DishId::new("dishA")).await.unwrap();
    assert!(!engine.store().contains(&DishId::new("dishA")));
}

#[tokio::test]
async fn test_server_set_is_authoritative() {
    let backend = FakeBackend::new();
    backend.seed_favorites([DishId::new("dishB"), DishId::new("dishC")]);
    let engine = FavoritesSyncEngine::new(&backend, FavoritesStore::new());

    // The client starts empty; the toggle response carries the whole set
    engine.toggle(&DishId::new("dishA")).await.unwrap();

    let set = engine.store().current();
    assert_eq!(set.len(), 3);
    assert!(set.contains(&DishId::new("dishB")));
}

#[tokio::test]
async fn test_failed_toggle_rolls_back() {
    let backend = FakeBackend::new();
    backend.seed_favorites([DishId::new("dishA")]);
    let engine = FavoritesSyncEngine::new(&backend, FavoritesStore::new());
    engine.toggle(&DishId::new("dishB")).await.unwrap();
    let before = engine.store().current();

    backend.fail_next(Endpoint::ToggleFavorite);
    assert!(engine.toggle(&DishId::new("dishC")).await.is_err());

    // Local set restored bit for bit; the server never saw the toggle
    assert_eq!(engine.store().current(), before);

    // And a retry lands cleanly
    engine.toggle(&DishId::new("dishC")).await.unwrap();
    assert!(engine.store().contains(&DishId::new("dishC")));
}
