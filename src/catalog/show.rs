use crate::catalog::Genre;
use crate::crawler::{Aggregate, Anchor, Dispatcher, LinkSelector, ListingDecoder, RequestOptions};
use crate::storage::{load_json, save_json};
use crate::url::{decode_id_segment, path_segments};
use crate::{CatalogError, DecodeError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A podcast show listed on a genre page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Show {
    pub id: u64,
    pub url: String,
    pub name: String,
}

impl Show {
    pub fn new(id: u64, url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            name: name.into(),
        }
    }
}

/// Decodes a show anchor: id from the last path segment, name from the text
pub fn decode_show(anchor: &Anchor) -> Result<Show, DecodeError> {
    let segments = path_segments(&anchor.href);
    let last = segments.last().ok_or_else(|| DecodeError::MalformedPath {
        url: anchor.href.clone(),
        reason: "link has no path segments".to_string(),
    })?;

    let id = decode_id_segment(&anchor.href, last)?;
    Ok(Show::new(id, anchor.href.clone(), anchor.text.clone()))
}

/// Builds options that visit every genre page with the given show selector
pub fn shows_request_options(genres: &[Genre], selector: &str) -> RequestOptions {
    RequestOptions::new(genres.iter().map(Genre::url).collect()).with_selector(selector)
}

/// Collects shows from a batch of genre pages
///
/// A page that fails (status, transport or any undecodable link) is reported
/// in `failures` and contributes no shows; other pages are unaffected. Shows
/// listed under several genres are kept once.
///
/// # Errors
///
/// Only when `options` carries no selector, or an invalid one. Nothing is
/// dispatched in that case.
pub async fn fetch_shows(
    dispatcher: &Dispatcher,
    options: &RequestOptions,
) -> Result<Aggregate<Show>, CatalogError> {
    let pattern = options
        .selector
        .as_deref()
        .ok_or_else(|| CatalogError::Selector {
            selector: String::new(),
            message: "a selector is required to collect shows".to_string(),
        })?;
    let selector = LinkSelector::parse(pattern)?;

    let decoder = ListingDecoder::new(selector, decode_show);
    let mut shows = dispatcher
        .dispatch_options(options, decoder)
        .partition()
        .await
        .flatten();

    for failure in &shows.failures {
        tracing::warn!("Skipping genre page: {}", failure);
    }

    shows.successes = super::dedup_by_id(shows.successes, |show| show.id);

    tracing::info!(
        "Collected {} shows from {} pages ({} failed)",
        shows.successes.len(),
        options.urls.len(),
        shows.failures.len()
    );

    Ok(shows)
}

pub fn save_shows(path: &Path, shows: &[Show]) -> Result<(), CatalogError> {
    Ok(save_json(path, shows)?)
}

pub fn load_shows(path: &Path) -> Result<Vec<Show>, CatalogError> {
    Ok(load_json(path)?)
}
