use std::path::PathBuf;

use musicrpc::management::{CACHE_VERSION, CacheManager};
use musicrpc::types::TrackExtras;
use tempfile::TempDir;

fn cache_path(dir: &TempDir) -> PathBuf {
    dir.path().join("cache/extras.json")
}

fn extras(artwork: &str) -> TrackExtras {
    TrackExtras {
        artwork_url: Some(artwork.to_string()),
        canonical_url: Some("https://music.apple.com/album/1".to_string()),
    }
}

#[tokio::test]
async fn test_put_then_get_returns_value() {
    let dir = TempDir::new().unwrap();
    let mut cache = CacheManager::load(cache_path(&dir), 100).await;

    let value = extras("https://example.com/a.jpg");
    cache.put("key-1".to_string(), value.clone()).await;

    // Same session: exact value back
    assert_eq!(cache.get("key-1"), Some(value));
    assert_eq!(cache.get("other"), None);
}

#[tokio::test]
async fn test_survives_reload() {
    let dir = TempDir::new().unwrap();
    let value = extras("https://example.com/a.jpg");

    {
        let mut cache = CacheManager::load(cache_path(&dir), 100).await;
        cache.put("key-1".to_string(), value.clone()).await;
    }

    // A fresh manager over the same path sees the persisted entry
    let cache = CacheManager::load(cache_path(&dir), 100).await;
    assert_eq!(cache.get("key-1"), Some(value));
}

#[tokio::test]
async fn test_missing_file_yields_empty_cache() {
    let dir = TempDir::new().unwrap();
    let cache = CacheManager::load(cache_path(&dir), 100).await;
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_version_mismatch_discards_everything() {
    let dir = TempDir::new().unwrap();
    let path = cache_path(&dir);

    // Persist one entry, then bump the version field on disk
    {
        let mut cache = CacheManager::load(path.clone(), 100).await;
        cache.put("key-1".to_string(), extras("a")).await;
    }
    let content = std::fs::read_to_string(&path).unwrap();
    let stale = content.replace(
        &format!("\"version\": {}", CACHE_VERSION),
        &format!("\"version\": {}", CACHE_VERSION + 1),
    );
    assert_ne!(content, stale);
    std::fs::write(&path, stale).unwrap();

    // Never a partial merge: the whole cache is rebuilt empty
    let cache = CacheManager::load(path, 100).await;
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_corrupt_file_yields_empty_cache() {
    let dir = TempDir::new().unwrap();
    let path = cache_path(&dir);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    let cache = CacheManager::load(path, 100).await;
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_capacity_evicts_oldest_inserted() {
    let dir = TempDir::new().unwrap();
    let mut cache = CacheManager::load(cache_path(&dir), 2).await;

    cache.put("first".to_string(), extras("1")).await;
    cache.put("second".to_string(), extras("2")).await;
    cache.put("third".to_string(), extras("3")).await;

    // FIFO, not LRU: the oldest insertion goes first
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("first"), None);
    assert!(cache.get("second").is_some());
    assert!(cache.get("third").is_some());
}

#[tokio::test]
async fn test_put_replaces_existing_key() {
    let dir = TempDir::new().unwrap();
    let mut cache = CacheManager::load(cache_path(&dir), 2).await;

    cache.put("key".to_string(), extras("old")).await;
    cache.put("key".to_string(), extras("new")).await;

    assert_eq!(cache.len(), 1);
    assert_eq!(
        cache.get("key").unwrap().artwork_url.as_deref(),
        Some("new")
    );
}

#[tokio::test]
async fn test_clear_removes_entries_and_file() {
    let dir = TempDir::new().unwrap();
    let path = cache_path(&dir);

    let mut cache = CacheManager::load(path.clone(), 100).await;
    cache.put("key".to_string(), extras("a")).await;
    cache.clear().await.unwrap();

    assert!(cache.is_empty());
    assert!(!path.exists());

    // Clearing an already-clean cache is not an error
    cache.clear().await.unwrap();
}
