use reqwest::Client;

use crate::{
    config,
    types::{Release, ReleaseSearchResponse},
};

/// MusicBrainz rejects anonymous clients, so every request carries the
/// crate name and version.
fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Searches MusicBrainz for releases matching a Lucene query expression.
///
/// The query is expected to be pre-built from escaped, field-qualified
/// clauses (see `management::resolver::release_query`). Results come back
/// in the service's relevance order, capped at 10.
///
/// # Returns
///
/// - `Ok(Vec<Release>)` - Candidate releases, possibly empty
/// - `Err(reqwest::Error)` - HTTP error, network error, or malformed body
pub async fn search_releases(
    client: &Client,
    query: &str,
) -> Result<Vec<Release>, reqwest::Error> {
    let api_url = format!("{}/release", config::musicbrainz_apiurl());
    let response = client
        .get(&api_url)
        .query(&[("query", query), ("fmt", "json"), ("limit", "10")])
        .header("user-agent", user_agent())
        .send()
        .await?
        .error_for_status()?;

    let json = response.json::<ReleaseSearchResponse>().await?;
    Ok(json.releases)
}

/// Probes the Cover Art Archive for a release's front cover.
///
/// A HEAD request confirms existence without transferring the image; any
/// 2xx (after redirects) yields the derivable artwork URL. Transport
/// failures and 404s both read as "no artwork here".
pub async fn probe_front_cover(client: &Client, release_id: &str) -> Option<String> {
    let url = format!("{}/release/{}/front", config::coverart_url(), release_id);
    match client.head(&url).send().await {
        Ok(response) if response.status().is_success() => Some(url),
        _ => None,
    }
}
