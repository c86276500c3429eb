//! Apple Music observer.
//!
//! The player is queried through scoped `osascript` JavaScript-for-Automation
//! snippets, one subprocess per question. Each query is independent and
//! side-effect free; the daemon treats the player purely as a polling
//! source and never drives it.

use tokio::process::Command;

use crate::{
    Res,
    types::{Artwork, PlayerState, TrackIdentity},
    utils,
};

/// Read-only view of the media player consumed by the presence loop.
#[allow(async_fn_in_trait)]
pub trait PlayerObserver {
    /// Whether the player process is running at all.
    async fn is_open(&self) -> Res<bool>;

    /// Current playback state.
    async fn player_state(&self) -> Res<PlayerState>;

    /// Properties of the current track, fresh from the player.
    async fn track_properties(&self) -> Res<TrackIdentity>;

    /// Raw cover-art bytes embedded in the player's library for the
    /// current track, if any.
    async fn artwork(&self) -> Res<Option<Artwork>>;
}

/// Observer for the Apple Music (or legacy iTunes) desktop player.
pub struct AppleMusicObserver {
    app_name: &'static str,
}

impl AppleMusicObserver {
    pub fn new(app_name: &'static str) -> Self {
        Self { app_name }
    }

    /// Picks the installed player app by macOS version: Catalina (10.15)
    /// replaced iTunes with Music. Defaults to Music when the version
    /// cannot be read.
    pub async fn detect() -> Self {
        let app_name = match macos_version().await {
            Some(version) if version < 10.15 => "iTunes",
            _ => "Music",
        };
        Self::new(app_name)
    }

    pub fn app_name(&self) -> &'static str {
        self.app_name
    }
}

impl PlayerObserver for AppleMusicObserver {
    async fn is_open(&self) -> Res<bool> {
        let script = format!(
            r#"Application("System Events").processes["{}"].exists()"#,
            self.app_name
        );
        let out = run_jxa(&script).await?;
        Ok(out == "true")
    }

    async fn player_state(&self) -> Res<PlayerState> {
        let script = format!(r#"Application("{}").playerState()"#, self.app_name);
        let out = run_jxa(&script).await?;
        Ok(PlayerState::parse(&out))
    }

    async fn track_properties(&self) -> Res<TrackIdentity> {
        let script = format!(
            r#"const music = Application("{}");
const props = music.currentTrack().properties();
JSON.stringify({{
    persistentID: props.persistentID,
    name: props.name,
    artist: props.artist,
    album: props.album,
    year: props.year,
    duration: props.duration,
    playerPosition: music.playerPosition(),
}})"#,
            self.app_name
        );
        let out = run_jxa(&script).await?;
        let identity: TrackIdentity = serde_json::from_str(&out)?;
        Ok(identity)
    }

    async fn artwork(&self) -> Res<Option<Artwork>> {
        let script = format!(
            r#"Application("{}").currentTrack().artworks[0].rawData()"#,
            self.app_name
        );
        // The script throws when the track has no artwork at all.
        let out = match run_jxa(&script).await {
            Ok(out) => out,
            Err(_) => return Ok(None),
        };

        Ok(utils::decode_hex_blob(&out).and_then(|data| {
            utils::detect_image_mime(&data).map(|mime| Artwork { data, mime })
        }))
    }
}

/// Runs one JXA snippet and returns its trimmed stdout.
async fn run_jxa(script: &str) -> Res<String> {
    let output = Command::new("osascript")
        .arg("-l")
        .arg("JavaScript")
        .arg("-e")
        .arg(script)
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("osascript failed: {}", stderr.trim()).into());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

async fn macos_version() -> Option<f64> {
    let output = Command::new("sw_vers")
        .arg("-productVersion")
        .output()
        .await
        .ok()?;
    let decoded = String::from_utf8_lossy(&output.stdout);
    let mut parts = decoded.trim().splitn(3, '.');
    let major: f64 = parts.next()?.parse().ok()?;
    let minor: f64 = parts.next().unwrap_or("0").parse().ok()?;
    Some(major + minor / 100.0)
}
