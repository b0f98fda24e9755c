use crate::error::StateError;
use crate::store::StateStore;

/// Run the full state store conformance test suite.
///
/// Call this from a backend's test module with a fresh store instance.
///
/// # Errors
///
/// Returns an error if any conformance test fails.
pub async fn run_store_conformance_tests(store: &dyn StateStore) -> Result<(), StateError> {
    test_get_missing(store).await;
    test_set_and_get(store).await;
    test_acquire_within_limit(store).await?;
    test_acquire_rejects_over_limit(store).await?;
    test_release_allows_reacquire(store).await?;
    test_fixed_window_allow(store).await?;
    Ok(())
}

async fn test_get_missing(store: &dyn StateStore) {
    let val = store.get("conformance:missing").await;
    assert!(val.is_none(), "get on missing key should return None");
}

async fn test_set_and_get(store: &dyn StateStore) {
    store.set("conformance:set-get", "hello").await;
    let val = store.get("conformance:set-get").await;
    assert_eq!(val.as_deref(), Some("hello"));
}

async fn test_acquire_within_limit(store: &dyn StateStore) -> Result<(), StateError> {
    let key = "conformance:acquire-within";
    assert!(store.acquire(key, 2).await?, "1st acquire within limit");
    assert!(store.acquire(key, 2).await?, "2nd acquire within limit");
    Ok(())
}

async fn test_acquire_rejects_over_limit(store: &dyn StateStore) -> Result<(), StateError> {
    let key = "conformance:acquire-over";
    assert!(store.acquire(key, 1).await?);
    assert!(
        !store.acquire(key, 1).await?,
        "acquire over limit should be rejected and rolled back"
    );
    Ok(())
}

async fn test_release_allows_reacquire(store: &dyn StateStore) -> Result<(), StateError> {
    let key = "conformance:release";
    assert!(store.acquire(key, 1).await?);
    assert!(!store.acquire(key, 1).await?);
    store.release(key).await?;
    assert!(
        store.acquire(key, 1).await?,
        "acquire should succeed again after release"
    );
    Ok(())
}

async fn test_fixed_window_allow(store: &dyn StateStore) -> Result<(), StateError> {
    let key = "conformance:fixed-window";
    for _ in 0..3 {
        assert!(store.fixed_window_allow(key, 3, 60).await?);
    }
    assert!(
        !store.fixed_window_allow(key, 3, 60).await?,
        "4th call should exceed the limit of 3"
    );
    Ok(())
}
