//! Configuration management for the presence daemon.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. Every external endpoint and
//! runtime knob can be overridden through the environment; everything has a
//! working default, so the daemon runs without any configuration at all.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf, time::Duration};

/// Discord application id registered for the Apple Music player.
const DEFAULT_CLIENT_ID: &str = "773825528921849856";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Looks for the file under the platform-specific local data directory
/// (`musicrpc/.env`), creating the directory first so users have a place to
/// drop overrides. A missing `.env` file is not an error; defaults apply.
///
/// # Errors
///
/// Returns an error string if the parent directory cannot be created.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("musicrpc/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    // Overrides are optional; ignore a missing or unreadable file.
    let _ = dotenv::from_path(path);
    Ok(())
}

/// Returns the Discord application (client) id used for the IPC handshake.
///
/// Overridable via `DISCORD_CLIENT_ID`.
pub fn discord_client_id() -> String {
    env::var("DISCORD_CLIENT_ID").unwrap_or_else(|_| DEFAULT_CLIENT_ID.to_string())
}

/// Returns the iTunes Search API endpoint.
///
/// Overridable via `ITUNES_SEARCH_URL`.
pub fn itunes_search_url() -> String {
    env::var("ITUNES_SEARCH_URL")
        .unwrap_or_else(|_| "https://itunes.apple.com/search".to_string())
}

/// Returns the storefront country for iTunes searches.
///
/// Defaults to the Japan store, which indexes both western and asian
/// catalogs and gives the broadest match coverage. Overridable via
/// `ITUNES_COUNTRY`.
pub fn itunes_country() -> String {
    env::var("ITUNES_COUNTRY").unwrap_or_else(|_| "JP".to_string())
}

/// Returns the MusicBrainz web service base URL.
///
/// Overridable via `MUSICBRAINZ_API_URL`.
pub fn musicbrainz_apiurl() -> String {
    env::var("MUSICBRAINZ_API_URL").unwrap_or_else(|_| "https://musicbrainz.org/ws/2".to_string())
}

/// Returns the Cover Art Archive base URL used for artwork probes.
///
/// Overridable via `COVERART_URL`.
pub fn coverart_url() -> String {
    env::var("COVERART_URL").unwrap_or_else(|_| "https://coverartarchive.org".to_string())
}

/// Returns the anonymous file-host endpoint used to publish artwork that
/// only exists in the local library.
///
/// Overridable via `ARTWORK_UPLOAD_URL`.
pub fn artwork_upload_url() -> String {
    env::var("ARTWORK_UPLOAD_URL").unwrap_or_else(|_| "https://catbox.moe/user/api.php".to_string())
}

/// Returns the path of the persisted extras cache.
///
/// Overridable via `MUSICRPC_CACHE_PATH`.
pub fn cache_path() -> PathBuf {
    if let Ok(path) = env::var("MUSICRPC_CACHE_PATH") {
        return PathBuf::from(path);
    }
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("musicrpc/cache/extras.json");
    path
}

/// Returns the maximum number of cached extras entries before FIFO eviction.
///
/// Overridable via `MUSICRPC_CACHE_CAPACITY`.
pub fn cache_capacity() -> usize {
    env::var("MUSICRPC_CACHE_CAPACITY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(100)
}

/// Returns the default poll interval of the presence loop.
///
/// Overridable via `MUSICRPC_POLL_INTERVAL` (seconds).
pub fn poll_interval() -> Duration {
    let secs = env::var("MUSICRPC_POLL_INTERVAL")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(15);
    Duration::from_secs(secs)
}
