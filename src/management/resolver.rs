use crate::{
    management::CacheManager,
    search::MusicSearch,
    types::{Artwork, ItunesResult, ItunesSearchResponse, TrackExtras, TrackIdentity},
    utils::{
        PLACEHOLDER_ALBUMS, PLACEHOLDER_ARTISTS, escape_query_term, search_term,
        strip_parenthetical,
    },
    warning,
};

/// Multi-source track-metadata resolution engine.
///
/// Takes the identity of the currently playing track and produces artwork
/// and canonical-link metadata through a bounded fallback cascade:
///
/// 1. song-level catalog search (with disambiguation among ambiguous hits)
/// 2. the same search with a trailing album parenthetical stripped
/// 3. release search + front-cover probe on the secondary service
/// 4. upload of the player's own artwork bytes
///
/// Results are cached persistently; a cache hit answers without any
/// outbound call. `resolve` never fails: total failure degrades to an
/// empty `TrackExtras`, which is itself cached so a dead lookup is not
/// retried on every poll.
pub struct MetadataResolver<S: MusicSearch> {
    search: S,
    cache: CacheManager,
}

impl<S: MusicSearch> MetadataResolver<S> {
    pub fn new(search: S, cache: CacheManager) -> Self {
        Self { search, cache }
    }

    /// Cache-only probe. Lets the caller find out whether `resolve` would
    /// go out to the network, so expensive inputs (local artwork bytes)
    /// are only gathered on an actual miss.
    pub fn lookup(&self, identity: &TrackIdentity) -> Option<TrackExtras> {
        self.cache.get(&identity.cache_key())
    }

    /// Resolves extras for a track, consulting the cache first.
    ///
    /// `local_artwork` is the player-library cover art to publish when
    /// neither catalog knows the track; pass `None` when the player has
    /// none or the caller already knows the cache will hit.
    pub async fn resolve(
        &mut self,
        identity: &TrackIdentity,
        local_artwork: Option<Artwork>,
    ) -> TrackExtras {
        let key = identity.cache_key();
        if let Some(extras) = self.cache.get(&key) {
            return extras;
        }

        let result = self.catalog_search(identity).await;
        let mut extras = match &result {
            Some(result) => TrackExtras {
                artwork_url: result.artwork_url100.clone(),
                canonical_url: result
                    .track_view_url
                    .clone()
                    .or_else(|| result.collection_view_url.clone()),
            },
            None => TrackExtras::empty(),
        };

        if extras.artwork_url.is_none() {
            extras.artwork_url = self.fallback_artwork(identity).await;
        }

        if extras.artwork_url.is_none() {
            if let Some(artwork) = local_artwork {
                match self.search.upload_artwork(artwork).await {
                    Ok(url) => extras.artwork_url = Some(url),
                    Err(e) => warning!("Failed to publish local artwork: {}", e),
                }
            }
        }

        self.cache.put(key, extras.clone()).await;
        extras
    }

    /// Primary song search over a bounded list of album variants: the
    /// album as tagged, then once more with a trailing parenthetical
    /// stripped (store catalogs list plain titles for many annotated
    /// editions).
    async fn catalog_search(&self, identity: &TrackIdentity) -> Option<ItunesResult> {
        let mut variants = vec![identity.album.trim().to_string()];
        let stripped = strip_parenthetical(&identity.album);
        if stripped != variants[0] {
            variants.push(stripped);
        }

        for album in &variants {
            let term = search_term(&identity.name, &identity.artist, album);
            let response = match self.search.song_search(&term).await {
                Ok(Some(response)) => response,
                Ok(None) => continue,
                Err(e) => {
                    warning!("Song search for '{}' failed: {}", term, e);
                    continue;
                }
            };

            if let Some(result) = find_matching_result(&identity.name, album, &response) {
                return Some(result);
            }
        }

        None
    }

    /// Secondary artwork lookup: release search, then a front-cover probe
    /// per candidate in the order the service returned them.
    async fn fallback_artwork(&self, identity: &TrackIdentity) -> Option<String> {
        let query = release_query(identity)?;
        let releases = match self.search.release_search(&query).await {
            Ok(releases) => releases,
            Err(e) => {
                warning!("Release search for '{}' failed: {}", query, e);
                return None;
            }
        };

        for release in &releases {
            if let Some(url) = self.search.front_cover(&release.id).await {
                return Some(url);
            }
        }

        None
    }
}

/// Picks the search result matching the target track.
///
/// A single result is accepted as-is. Among multiple results the first
/// whose collection name contains the album AND whose track name contains
/// the name wins, both case-insensitive. Containment instead of equality:
/// store metadata for imported and non-standard releases rarely equals the
/// local tags exactly.
pub fn find_matching_result(
    name: &str,
    album: &str,
    response: &ItunesSearchResponse,
) -> Option<ItunesResult> {
    if response.results.is_empty() {
        return None;
    }
    if response.results.len() == 1 {
        return Some(response.results[0].clone());
    }

    let album_lower = album.to_lowercase();
    let name_lower = name.to_lowercase();
    response
        .results
        .iter()
        .find(|r| {
            r.collection_name.to_lowercase().contains(&album_lower)
                && r.track_name.to_lowercase().contains(&name_lower)
        })
        .cloned()
}

/// Builds the field-qualified release-search expression.
///
/// The `artist:` clause is included only for a real artist name (non-empty
/// and not a tagger placeholder); the release is matched by album title
/// when one exists, else by recording (track) name. Returns `None` when
/// the identity carries nothing worth searching for.
pub fn release_query(identity: &TrackIdentity) -> Option<String> {
    let album = identity.album.trim();
    let name = identity.name.trim();

    let subject = if !album.is_empty() && !PLACEHOLDER_ALBUMS.contains(&album) {
        format!("release:\"{}\"", escape_query_term(album))
    } else if !name.is_empty() {
        format!("recording:\"{}\"", escape_query_term(name))
    } else {
        return None;
    };

    let mut clauses = Vec::new();
    let artist = identity.artist.trim();
    if !artist.is_empty() && !PLACEHOLDER_ARTISTS.contains(&artist) {
        clauses.push(format!("artist:\"{}\"", escape_query_term(artist)));
    }
    clauses.push(subject);

    Some(clauses.join(" AND "))
}
