//! Directory listing fetches
//!
//! Two shapes of listing fetch exist:
//! - A single directory page, where any failure (status or decode) is fatal
//!   for the whole call
//! - A batch of directory pages through the dispatcher, where a bad page only
//!   fails its own envelope

use crate::crawler::decoder::Decoder;
use crate::crawler::extractor::{Anchor, LinkSelector};
use crate::crawler::fetcher::fetch_body;
use crate::{CatalogError, DecodeError};
use reqwest::Client;

/// Fetches one directory page and returns its matched anchors
///
/// A non-2xx response returns that status error and no anchors.
pub async fn fetch_listing(
    client: &Client,
    url: &str,
    selector: &LinkSelector,
) -> Result<Vec<Anchor>, CatalogError> {
    let body = fetch_body(client, url).await?;
    let anchors = selector.extract(&String::from_utf8_lossy(&body));

    tracing::debug!(
        "{} anchors matched '{}' on {}",
        anchors.len(),
        selector.pattern(),
        url
    );

    Ok(anchors)
}

/// Fetches one directory page and decodes every anchor, all or nothing
pub async fn fetch_listing_with<T, F>(
    client: &Client,
    url: &str,
    selector: &LinkSelector,
    decode_anchor: F,
) -> Result<Vec<T>, CatalogError>
where
    F: Fn(&Anchor) -> Result<T, DecodeError>,
{
    fetch_listing(client, url, selector)
        .await?
        .iter()
        .map(|anchor| {
            decode_anchor(anchor).map_err(|source| CatalogError::decode(url, source))
        })
        .collect()
}

/// Decodes a directory page into one entity per matched anchor
///
/// Used for batches: the first anchor that fails to decode fails the page it
/// came from, leaving sibling pages untouched.
pub struct ListingDecoder<F> {
    selector: LinkSelector,
    decode_anchor: F,
}

impl<F> ListingDecoder<F> {
    pub fn new(selector: LinkSelector, decode_anchor: F) -> Self {
        Self {
            selector,
            decode_anchor,
        }
    }
}

impl<T, F> Decoder for ListingDecoder<F>
where
    F: Fn(&Anchor) -> Result<T, DecodeError> + Send + Sync + 'static,
    T: Send + 'static,
{
    type Entity = Vec<T>;

    fn decode(&self, url: &str, body: &[u8]) -> Result<Vec<T>, DecodeError> {
        let anchors = self.selector.extract(&String::from_utf8_lossy(body));
        tracing::trace!("{} anchors on {}", anchors.len(), url);

        anchors.iter().map(&self.decode_anchor).collect()
    }
}
