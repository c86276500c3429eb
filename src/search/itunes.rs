use std::time::Duration;

use reqwest::Client;
use tokio::time::sleep;

use crate::{config, types::ItunesSearchResponse, warning};

/// Number of attempts against the search endpoint before giving up.
const SEARCH_ATTEMPTS: u32 = 3;

/// Fixed delay between attempts on a non-success status.
const RETRY_DELAY: Duration = Duration::from_millis(200);

/// Searches the iTunes catalog for songs matching a free-text term.
///
/// Issues up to three GET requests against the search endpoint with a fixed
/// short delay between attempts whenever the service answers with a
/// non-success status. Exhausting the attempts is not an error: the caller
/// receives `Ok(None)` and treats it as an empty result set, so a flaky
/// search never aborts a whole resolution.
///
/// # Arguments
///
/// * `client` - Shared reqwest client
/// * `term` - Free-text term, typically `"{name} {artist} {album}"`
///
/// # Returns
///
/// - `Ok(Some(response))` - The parsed search response
/// - `Ok(None)` - Non-success status on every attempt
/// - `Err(reqwest::Error)` - Network failure or malformed response body
pub async fn search_song(
    client: &Client,
    term: &str,
) -> Result<Option<ItunesSearchResponse>, reqwest::Error> {
    let api_url = config::itunes_search_url();
    let country = config::itunes_country();

    for attempt in 1..=SEARCH_ATTEMPTS {
        let response = client
            .get(&api_url)
            .query(&[
                ("media", "music"),
                ("entity", "song"),
                ("term", term),
                ("country", country.as_str()),
                ("limit", "10"),
            ])
            .send()
            .await?;

        if response.status().is_success() {
            let json = response.json::<ItunesSearchResponse>().await?;
            return Ok(Some(json));
        }

        warning!(
            "Song search for '{}' returned {} (attempt {}/{})",
            term,
            response.status(),
            attempt,
            SEARCH_ATTEMPTS
        );
        if attempt < SEARCH_ATTEMPTS {
            sleep(RETRY_DELAY).await;
        }
    }

    Ok(None)
}
