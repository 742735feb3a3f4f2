use crate::catalog::Show;
use crate::crawler::{Aggregate, Decoder, Dispatcher, JsonDecoder, RequestOptions};
use crate::storage::{load_json, save_json};
use crate::url::lookup_url;
use crate::{CatalogError, DecodeError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Full metadata of a show, from the lookup API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowDetails {
    pub id: u64,
    pub rss_url: String,
    pub name: String,
    pub genres: Vec<String>,
    pub artist: String,
    pub image: ShowImage,
}

/// Artwork URLs in three sizes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowImage {
    pub small: String,
    pub medium: String,
    pub big: String,
}

/// Body of a lookup API response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub results: Vec<LookupResult>,
}

/// One entry of a lookup API response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LookupResult {
    pub collection_id: u64,
    pub artist_name: String,
    pub collection_name: String,
    pub genre_ids: Vec<String>,
    #[serde(rename = "artworkURL30", alias = "artworkUrl30")]
    pub artwork_url_30: String,
    #[serde(rename = "artworkURL60", alias = "artworkUrl60")]
    pub artwork_url_60: String,
    #[serde(rename = "artworkURL100", alias = "artworkUrl100")]
    pub artwork_url_100: String,
    pub feed_url: String,
}

impl LookupResponse {
    /// Maps the first result to show details
    ///
    /// An empty result list means the show does not exist; that is a decode
    /// failure for this URL, not a transport error.
    pub fn into_details(self, url: &str) -> Result<ShowDetails, DecodeError> {
        let result = self
            .results
            .into_iter()
            .next()
            .ok_or_else(|| DecodeError::ShowNotFound {
                url: url.to_string(),
            })?;

        if result.collection_id == 0 {
            return Err(DecodeError::NonPositiveId {
                url: url.to_string(),
            });
        }

        Ok(ShowDetails {
            id: result.collection_id,
            rss_url: result.feed_url,
            name: result.collection_name,
            genres: result.genre_ids,
            artist: result.artist_name,
            image: ShowImage {
                small: result.artwork_url_30,
                medium: result.artwork_url_60,
                big: result.artwork_url_100,
            },
        })
    }
}

/// Decodes a lookup API body straight into show details
pub fn decode_lookup(url: &str, body: &[u8]) -> Result<ShowDetails, DecodeError> {
    JsonDecoder::<LookupResponse>::new()
        .decode(url, body)?
        .into_details(url)
}

/// Builds one lookup request per distinct show id, starting `delay` apart
///
/// A show listed under several genres is looked up once.
pub fn details_request_options(
    shows: &[Show],
    lookup_base: &str,
    delay: Duration,
) -> RequestOptions {
    let urls = super::dedup_by_id(shows.iter().collect::<Vec<&Show>>(), |show| show.id)
        .into_iter()
        .map(|show| lookup_url(lookup_base, show.id))
        .collect();

    RequestOptions::new(urls).with_min_interval(delay)
}

/// Looks up details for a batch of shows
///
/// Every URL yields either details or an entry in `failures`.
pub async fn fetch_details(
    dispatcher: &Dispatcher,
    options: &RequestOptions,
) -> Aggregate<ShowDetails> {
    let details = dispatcher
        .dispatch_options(options, decode_lookup)
        .partition()
        .await;

    for failure in &details.failures {
        tracing::warn!("Lookup failed: {}", failure);
    }

    tracing::info!(
        "Collected details for {} of {} shows",
        details.successes.len(),
        options.urls.len()
    );

    details
}

pub fn save_details(path: &Path, details: &[ShowDetails]) -> Result<(), CatalogError> {
    Ok(save_json(path, details)?)
}

pub fn load_details(path: &Path) -> Result<Vec<ShowDetails>, CatalogError> {
    Ok(load_json(path)?)
}
