use crate::crawler::{fetch_listing_with, Anchor, LinkSelector};
use crate::storage::{load_json, save_json};
use crate::url::{decode_slug_path, genre_url, GENRE_KIND_PREFIX};
use crate::{CatalogError, DecodeError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A podcast genre from the directory
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

impl Genre {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Canonical directory URL of this genre
    pub fn url(&self) -> String {
        genre_url(self.id, &self.name)
    }
}

/// Decodes a genre anchor (`.../podcasts-<name>/id<N>`)
pub fn decode_genre(anchor: &Anchor) -> Result<Genre, DecodeError> {
    let (id, name) = decode_slug_path(&anchor.href, GENRE_KIND_PREFIX)?;
    Ok(Genre::new(id, name.to_lowercase()))
}

/// Fetches the genre directory page and decodes every matched anchor
///
/// This is a single-page fetch: a non-2xx status or any undecodable link
/// fails the whole call and no genres are returned.
pub async fn fetch_genres(
    client: &Client,
    url: &str,
    selector: &str,
) -> Result<Vec<Genre>, CatalogError> {
    let selector = LinkSelector::parse(selector)?;
    let genres = fetch_listing_with(client, url, &selector, decode_genre).await?;
    let genres = super::dedup_by_id(genres, |genre| genre.id);

    tracing::info!("Collected {} genres from {}", genres.len(), url);
    Ok(genres)
}

pub fn save_genres(path: &Path, genres: &[Genre]) -> Result<(), CatalogError> {
    Ok(save_json(path, genres)?)
}

pub fn load_genres(path: &Path) -> Result<Vec<Genre>, CatalogError> {
    Ok(load_json(path)?)
}
