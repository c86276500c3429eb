//! Presence synchronization loop.
//!
//! [`Synchronizer::tick`] turns one player observation into one transport
//! action (publish or clear); [`Synchronizer::run`] is the supervisor that
//! wraps the tick loop in a connect / fail / reconnect cycle so a transient
//! transport or network failure never terminates the process.

use std::time::Duration;

use chrono::Utc;
use tokio::time::sleep;

use crate::{
    Res,
    discord::Transport,
    info,
    management::MetadataResolver,
    player::PlayerObserver,
    search::MusicSearch,
    types::{
        Activity, ActivityAssets, ActivityButton, ActivityTimestamps, PlayerState, TrackExtras,
        TrackIdentity,
    },
    utils::clamp_for_display,
    warning,
};

/// Hard limits of the presence protocol's string fields.
const DISPLAY_MIN: usize = 2;
const DISPLAY_MAX: usize = 128;

/// Button URLs above this length are dropped rather than truncated.
const BUTTON_URL_MAX: usize = 512;

/// Fixed delay before reconnecting after a transport failure.
const RECONNECT_DELAY: Duration = Duration::from_secs(15);

/// Margin added past the track end so the refresh lands after the player
/// has moved on.
const END_MARGIN: Duration = Duration::from_secs(1);

/// Polling state machine binding the player observer, the metadata
/// resolver and the presence transport together.
///
/// Single logical thread of control: a tick runs to completion (including
/// any resolution and publish) before the next delay is scheduled, so no
/// two resolutions for the same track are ever in flight at once.
pub struct Synchronizer<O, S, T>
where
    O: PlayerObserver,
    S: MusicSearch,
    T: Transport,
{
    observer: O,
    resolver: MetadataResolver<S>,
    transport: T,
    default_interval: Duration,
}

impl<O, S, T> Synchronizer<O, S, T>
where
    O: PlayerObserver,
    S: MusicSearch,
    T: Transport,
{
    pub fn new(
        observer: O,
        resolver: MetadataResolver<S>,
        transport: T,
        default_interval: Duration,
    ) -> Self {
        Self {
            observer,
            resolver,
            transport,
            default_interval,
        }
    }

    /// One poll tick: observe the player, resolve extras (cache first),
    /// publish or clear. Returns the delay until the next tick.
    ///
    /// Observer and transport failures bubble up to the supervisor; an
    /// unknown player state only skips this tick.
    pub async fn tick(&mut self) -> Res<Duration> {
        if !self.observer.is_open().await? {
            self.transport.clear_activity().await?;
            return Ok(self.default_interval);
        }

        match self.observer.player_state().await? {
            PlayerState::Playing => {
                let identity = self.observer.track_properties().await?;

                // Local artwork bytes are only worth extracting when the
                // cache is about to miss.
                let extras = match self.resolver.lookup(&identity) {
                    Some(extras) => extras,
                    None => {
                        let artwork = self.observer.artwork().await.unwrap_or(None);
                        self.resolver.resolve(&identity, artwork).await
                    }
                };

                let activity = build_activity(&identity, &extras, Utc::now().timestamp_millis());
                self.transport.set_activity(&activity).await?;
                Ok(next_delay(
                    identity.duration,
                    identity.player_position,
                    self.default_interval,
                ))
            }

            PlayerState::Paused | PlayerState::Stopped => {
                self.transport.clear_activity().await?;
                Ok(self.default_interval)
            }

            PlayerState::Unknown(raw) => {
                warning!("Unknown player state '{}', skipping this tick", raw);
                Ok(self.default_interval)
            }
        }
    }

    /// Supervisor loop: connect, tick until something fails, close,
    /// wait a fixed delay, reconnect. Never returns.
    pub async fn run(mut self) {
        loop {
            if let Err(e) = self.transport.connect().await {
                warning!("Cannot connect to Discord: {}", e);
                sleep(RECONNECT_DELAY).await;
                continue;
            }
            info!("Connected to Discord");

            loop {
                match self.tick().await {
                    Ok(delay) => sleep(delay).await,
                    Err(e) => {
                        warning!("Presence tick failed: {}", e);
                        break;
                    }
                }
            }

            self.transport.close().await;
            info!("Reconnecting in {:?}", RECONNECT_DELAY);
            sleep(RECONNECT_DELAY).await;
        }
    }
}

/// Builds the presence payload for a playing track.
///
/// Every display string goes through `clamp_for_display`; the transport
/// rejects fields outside 2..=128 characters outright. Tracks without a
/// known duration (radio streams) get no timestamps, but album assets and
/// buttons are still emitted when the metadata exists.
pub fn build_activity(identity: &TrackIdentity, extras: &TrackExtras, now_ms: i64) -> Activity {
    let timestamps = identity.duration.map(|duration| {
        let position_ms = (identity.player_position * 1000.0).round() as i64;
        let remaining_ms = ((duration - identity.player_position) * 1000.0).round() as i64;
        ActivityTimestamps {
            start: Some(now_ms - position_ms),
            end: Some(now_ms + remaining_ms),
        }
    });

    let mut activity = Activity {
        activity_type: 2,
        details: clamp_for_display(&identity.name, DISPLAY_MIN, DISPLAY_MAX),
        details_url: extras.canonical_url.clone(),
        state: None,
        state_url: None,
        status_display_type: None,
        timestamps,
        assets: None,
        buttons: None,
    };

    let artist = identity.artist.trim();
    if !artist.is_empty() {
        // Makes the client render the artist line instead of the app name.
        activity.status_display_type = Some(1);
        activity.state = Some(clamp_for_display(artist, DISPLAY_MIN, DISPLAY_MAX));
    }

    let album = identity.album.trim();
    if !album.is_empty() {
        activity.assets = Some(ActivityAssets {
            large_image: extras.artwork_url.clone(),
            large_text: Some(clamp_for_display(album, DISPLAY_MIN, DISPLAY_MAX)),
            large_url: extras.canonical_url.clone(),
        });
    }

    let mut buttons = Vec::new();
    let name = identity.name.trim();
    if !artist.is_empty() && !name.is_empty() {
        let query = urlencoding::encode(&format!("artist:{} track:{}", artist, name)).into_owned();
        let url = format!("https://open.spotify.com/search/{}?si", query);
        if url.len() <= BUTTON_URL_MAX {
            buttons.push(ActivityButton {
                label: "Search on Spotify".to_string(),
                url,
            });
        }
    }
    if !buttons.is_empty() {
        activity.buttons = Some(buttons);
    }

    activity
}

/// Adaptive poll delay: while a track with known length plays, wake up
/// just after it ends so the presence refreshes near track boundaries;
/// never later than the default interval.
pub fn next_delay(duration: Option<f64>, position: f64, default: Duration) -> Duration {
    match duration {
        Some(duration) => {
            let remaining = (duration - position).max(0.0);
            (Duration::from_secs_f64(remaining) + END_MARGIN).min(default)
        }
        None => default,
    }
}
