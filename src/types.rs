use serde::{Deserialize, Serialize};

/// Playback state reported by the Apple Music scripting interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerState {
    Playing,
    Paused,
    Stopped,
    /// Anything the player reports that we do not know how to handle
    /// (e.g. "fast forwarding"). The raw value is kept for logging.
    Unknown(String),
}

impl PlayerState {
    pub fn parse(raw: &str) -> PlayerState {
        match raw {
            "playing" => PlayerState::Playing,
            "paused" => PlayerState::Paused,
            "stopped" => PlayerState::Stopped,
            other => PlayerState::Unknown(other.to_string()),
        }
    }
}

/// Properties of the current track, produced fresh on every poll.
///
/// `persistent_id` is the player's stable library identifier and is the
/// preferred cache key material; the free-text fields are the fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackIdentity {
    #[serde(rename = "persistentID", default)]
    pub persistent_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub duration: Option<f64>,
    pub player_position: f64,
}

impl TrackIdentity {
    /// Deterministic cache key: the stable persistent id when the player
    /// exposes one, otherwise the trimmed free-text tuple joined with a
    /// unit separator so re-tagged duplicates cannot collide with real
    /// field contents.
    pub fn cache_key(&self) -> String {
        match &self.persistent_id {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => format!(
                "{}\u{1f}{}\u{1f}{}",
                self.name.trim(),
                self.artist.trim(),
                self.album.trim()
            ),
        }
    }
}

/// Resolved, cacheable metadata for one track. Immutable once stored; a
/// re-resolution replaces the whole entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackExtras {
    pub artwork_url: Option<String>,
    pub canonical_url: Option<String>,
}

impl TrackExtras {
    pub fn empty() -> Self {
        TrackExtras {
            artwork_url: None,
            canonical_url: None,
        }
    }
}

/// On-disk shape of the extras cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFile {
    pub version: u32,
    pub entries: Vec<(String, TrackExtras)>,
}

/// Raw artwork bytes pulled out of the player's own library.
#[derive(Debug, Clone)]
pub struct Artwork {
    pub data: Vec<u8>,
    pub mime: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItunesSearchResponse {
    pub result_count: u32,
    #[serde(default)]
    pub results: Vec<ItunesResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItunesResult {
    #[serde(default)]
    pub track_name: String,
    #[serde(default)]
    pub collection_name: String,
    #[serde(default)]
    pub artwork_url100: Option<String>,
    #[serde(default)]
    pub collection_view_url: Option<String>,
    #[serde(default)]
    pub track_view_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseSearchResponse {
    #[serde(default)]
    pub releases: Vec<Release>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub id: String,
}

/// Rich-presence payload published over the Discord IPC socket.
///
/// Every string field must stay within the protocol's 2..=128 character
/// window; button URLs within 512. Callers are expected to run display
/// strings through `utils::clamp_for_display` before building one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// 2 = "Listening to".
    #[serde(rename = "type")]
    pub activity_type: u8,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_display_type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<ActivityTimestamps>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<ActivityAssets>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<ActivityButton>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTimestamps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityAssets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityButton {
    pub label: String,
    pub url: String,
}
