//! HTTP clients for the external music databases.
//!
//! Three services cooperate to enrich a bare `(name, artist, album)` tuple:
//!
//! - [`itunes`] - primary song-level search (artwork + canonical store links)
//! - [`musicbrainz`] - secondary release search plus the Cover Art Archive
//!   front-cover probe, for tracks the primary catalog does not carry
//! - [`upload`] - anonymous file-host upload for artwork that only exists
//!   inside the local library
//!
//! The [`MusicSearch`] trait is the seam between the resolver and the
//! network; [`HttpSearch`] is the production implementation.

use reqwest::Client;

use crate::{
    Res,
    types::{Artwork, ItunesSearchResponse, Release},
};

pub mod itunes;
pub mod musicbrainz;
pub mod upload;

/// Outbound operations the metadata resolver needs from the music services.
///
/// Futures here only need to run on the single control task, so no `Send`
/// bound is promised.
#[allow(async_fn_in_trait)]
pub trait MusicSearch {
    /// Free-text song search. `Ok(None)` means the service answered with
    /// non-success status on every attempt and should be treated as an
    /// empty result set.
    async fn song_search(&self, term: &str) -> Res<Option<ItunesSearchResponse>>;

    /// Field-qualified (Lucene syntax) release search.
    async fn release_search(&self, query: &str) -> Res<Vec<Release>>;

    /// Probes whether front-cover artwork exists for a release. Any
    /// transport failure counts as "no artwork".
    async fn front_cover(&self, release_id: &str) -> Option<String>;

    /// Publishes locally extracted artwork bytes, returning a public URL.
    async fn upload_artwork(&self, artwork: Artwork) -> Res<String>;
}

/// Production `MusicSearch` backed by reqwest.
pub struct HttpSearch {
    client: Client,
}

impl HttpSearch {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl MusicSearch for HttpSearch {
    async fn song_search(&self, term: &str) -> Res<Option<ItunesSearchResponse>> {
        Ok(itunes::search_song(&self.client, term).await?)
    }

    async fn release_search(&self, query: &str) -> Res<Vec<Release>> {
        Ok(musicbrainz::search_releases(&self.client, query).await?)
    }

    async fn front_cover(&self, release_id: &str) -> Option<String> {
        musicbrainz::probe_front_cover(&self.client, release_id).await
    }

    async fn upload_artwork(&self, artwork: Artwork) -> Res<String> {
        upload::upload_artwork(&self.client, artwork).await
    }
}
