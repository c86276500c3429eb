use std::sync::{Arc, Mutex};
use std::time::Duration;

use musicrpc::Res;
use musicrpc::discord::Transport;
use musicrpc::management::{CacheManager, MetadataResolver};
use musicrpc::player::PlayerObserver;
use musicrpc::presence::{Synchronizer, build_activity, next_delay};
use musicrpc::search::MusicSearch;
use musicrpc::types::{
    Activity, Artwork, ItunesSearchResponse, PlayerState, Release, TrackExtras, TrackIdentity,
};
use tempfile::TempDir;

struct MockObserver {
    open: bool,
    state: PlayerState,
    track: TrackIdentity,
}

impl PlayerObserver for MockObserver {
    async fn is_open(&self) -> Res<bool> {
        Ok(self.open)
    }

    async fn player_state(&self) -> Res<PlayerState> {
        Ok(self.state.clone())
    }

    async fn track_properties(&self) -> Res<TrackIdentity> {
        Ok(self.track.clone())
    }

    async fn artwork(&self) -> Res<Option<Artwork>> {
        Ok(None)
    }
}

/// Search stub that never finds anything; resolution degrades to empty
/// extras, which is all these tests need.
struct NullSearch;

impl MusicSearch for NullSearch {
    async fn song_search(&self, _term: &str) -> Res<Option<ItunesSearchResponse>> {
        Ok(Some(ItunesSearchResponse {
            result_count: 0,
            results: Vec::new(),
        }))
    }

    async fn release_search(&self, _query: &str) -> Res<Vec<Release>> {
        Ok(Vec::new())
    }

    async fn front_cover(&self, _release_id: &str) -> Option<String> {
        None
    }

    async fn upload_artwork(&self, _artwork: Artwork) -> Res<String> {
        Err("upload disabled".into())
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Published {
    Set(Activity),
    Clear,
}

struct MockTransport {
    log: Arc<Mutex<Vec<Published>>>,
}

impl Transport for MockTransport {
    async fn connect(&mut self) -> Res<()> {
        Ok(())
    }

    async fn set_activity(&mut self, activity: &Activity) -> Res<()> {
        self.log.lock().unwrap().push(Published::Set(activity.clone()));
        Ok(())
    }

    async fn clear_activity(&mut self) -> Res<()> {
        self.log.lock().unwrap().push(Published::Clear);
        Ok(())
    }

    async fn close(&mut self) {}
}

fn track(name: &str, artist: &str, album: &str) -> TrackIdentity {
    TrackIdentity {
        persistent_id: Some("ID-1".to_string()),
        name: name.to_string(),
        artist: artist.to_string(),
        album: album.to_string(),
        year: Some(2020),
        duration: Some(200.0),
        player_position: 50.0,
    }
}

fn extras() -> TrackExtras {
    TrackExtras {
        artwork_url: Some("https://example.com/a.jpg".to_string()),
        canonical_url: Some("https://music.apple.com/song/1".to_string()),
    }
}

async fn synchronizer(
    observer: MockObserver,
) -> (
    Synchronizer<MockObserver, NullSearch, MockTransport>,
    Arc<Mutex<Vec<Published>>>,
    TempDir,
) {
    let dir = TempDir::new().unwrap();
    let cache = CacheManager::load(dir.path().join("extras.json"), 100).await;
    let resolver = MetadataResolver::new(NullSearch, cache);
    let log = Arc::new(Mutex::new(Vec::new()));
    let transport = MockTransport {
        log: Arc::clone(&log),
    };
    let sync = Synchronizer::new(observer, resolver, transport, Duration::from_secs(15));
    (sync, log, dir)
}

#[test]
fn test_build_activity_timestamps() {
    let now_ms = 1_000_000_000_i64;
    let activity = build_activity(&track("Song", "Artist", "Album"), &extras(), now_ms);

    // duration 200 at position 50 -> ends 150s from now, started 50s ago
    let timestamps = activity.timestamps.unwrap();
    assert_eq!(timestamps.end, Some(now_ms + 150_000));
    assert_eq!(timestamps.start, Some(now_ms - 50_000));
}

#[test]
fn test_build_activity_fields_are_clamped() {
    let long = "x".repeat(300);
    let activity = build_activity(&track(&long, &long, &long), &extras(), 0);

    assert!(activity.details.chars().count() <= 128);
    assert!(activity.state.unwrap().chars().count() <= 128);
    let assets = activity.assets.unwrap();
    assert!(assets.large_text.unwrap().chars().count() <= 128);

    // An artist line that long makes the search URL exceed the button
    // limit, so the button is dropped rather than truncated
    assert!(activity.buttons.is_none());
}

#[test]
fn test_build_activity_links_and_buttons() {
    let activity = build_activity(&track("Song", "Artist", "Album"), &extras(), 0);

    assert_eq!(activity.activity_type, 2);
    assert_eq!(
        activity.details_url.as_deref(),
        Some("https://music.apple.com/song/1")
    );
    assert_eq!(activity.status_display_type, Some(1));

    let assets = activity.assets.unwrap();
    assert_eq!(assets.large_image.as_deref(), Some("https://example.com/a.jpg"));

    let buttons = activity.buttons.unwrap();
    assert_eq!(buttons.len(), 1);
    assert_eq!(buttons[0].label, "Search on Spotify");
    assert!(buttons[0].url.len() <= 512);
    assert!(buttons[0].url.starts_with("https://open.spotify.com/search/"));
}

#[test]
fn test_build_activity_without_duration_omits_timestamps() {
    // Radio streams have no known length
    let mut radio = track("Live Stream", "Some Station", "");
    radio.duration = None;

    let activity = build_activity(&radio, &TrackExtras::empty(), 0);
    assert!(activity.timestamps.is_none());

    // No album metadata -> no assets either
    assert!(activity.assets.is_none());
}

#[test]
fn test_build_activity_without_artist() {
    let mut anonymous = track("Song", "", "Album");
    anonymous.artist = "  ".to_string();

    let activity = build_activity(&anonymous, &extras(), 0);
    assert!(activity.state.is_none());
    assert!(activity.status_display_type.is_none());
    assert!(activity.buttons.is_none());
}

#[test]
fn test_next_delay() {
    let default = Duration::from_secs(15);

    // Track about to end: wake just after the boundary
    assert_eq!(next_delay(Some(200.0), 195.0, default), Duration::from_secs(6));

    // Plenty of track left: the default interval caps the delay
    assert_eq!(next_delay(Some(200.0), 50.0, default), default);

    // Position past the end (seek race): margin only, no underflow
    assert_eq!(next_delay(Some(200.0), 250.0, default), Duration::from_secs(1));

    // No duration known: fixed default
    assert_eq!(next_delay(None, 50.0, default), default);
}

#[tokio::test]
async fn test_tick_publishes_while_playing() {
    let observer = MockObserver {
        open: true,
        state: PlayerState::Playing,
        track: track("Song", "Artist", "Album"),
    };
    let (mut sync, log, _dir) = synchronizer(observer).await;

    let delay = sync.tick().await.unwrap();
    assert_eq!(delay, Duration::from_secs(15));

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    match &log[0] {
        Published::Set(activity) => {
            assert_eq!(activity.details, "Song");
            assert_eq!(activity.state.as_deref(), Some("Artist"));
            assert!(activity.timestamps.is_some());
        }
        other => panic!("expected a publish, got {:?}", other),
    }
}

#[tokio::test]
async fn test_tick_clears_when_paused_or_closed() {
    // Paused player: presence is cleared
    let observer = MockObserver {
        open: true,
        state: PlayerState::Paused,
        track: track("Song", "Artist", "Album"),
    };
    let (mut sync, log, _dir) = synchronizer(observer).await;
    let delay = sync.tick().await.unwrap();
    assert_eq!(delay, Duration::from_secs(15));
    assert_eq!(*log.lock().unwrap(), vec![Published::Clear]);

    // Player not running at all: cleared regardless of state
    let observer = MockObserver {
        open: false,
        state: PlayerState::Playing,
        track: track("Song", "Artist", "Album"),
    };
    let (mut sync, log, _dir) = synchronizer(observer).await;
    sync.tick().await.unwrap();
    assert_eq!(*log.lock().unwrap(), vec![Published::Clear]);
}

#[tokio::test]
async fn test_tick_skips_unknown_state() {
    let observer = MockObserver {
        open: true,
        state: PlayerState::Unknown("fast forwarding".to_string()),
        track: track("Song", "Artist", "Album"),
    };
    let (mut sync, log, _dir) = synchronizer(observer).await;

    // The tick is aborted: nothing published, next poll at the default
    let delay = sync.tick().await.unwrap();
    assert_eq!(delay, Duration::from_secs(15));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_repeated_ticks_reuse_the_cache() {
    let observer = MockObserver {
        open: true,
        state: PlayerState::Playing,
        track: track("Song", "Artist", "Album"),
    };
    let (mut sync, log, _dir) = synchronizer(observer).await;

    sync.tick().await.unwrap();
    sync.tick().await.unwrap();

    // Same track, same state: equivalent payloads (timestamps aside)
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 2);
    match (&log[0], &log[1]) {
        (Published::Set(a), Published::Set(b)) => {
            assert_eq!(a.details, b.details);
            assert_eq!(a.state, b.state);
            assert_eq!(a.assets, b.assets);
            assert_eq!(a.buttons, b.buttons);
        }
        other => panic!("expected two publishes, got {:?}", other),
    }
}
