//! Catalog collectors
//!
//! Each collector assembles URLs and a decoder, runs them through the crawler
//! and maps the outcome to catalog records:
//! - Genres come from a single directory page (all or nothing)
//! - Shows come from a batch of genre pages (partial failure)
//! - Show details come from a batch of lookup API calls (partial failure)

mod details;
mod genre;
mod show;

pub use details::{
    decode_lookup, details_request_options, fetch_details, load_details, save_details,
    LookupResponse, LookupResult, ShowDetails, ShowImage,
};
pub use genre::{decode_genre, fetch_genres, load_genres, save_genres, Genre};
pub use show::{decode_show, fetch_shows, load_shows, save_shows, shows_request_options, Show};

use std::collections::HashSet;

/// Drops entries whose id was already seen, keeping the first occurrence
pub(crate) fn dedup_by_id<T>(items: Vec<T>, id: impl Fn(&T) -> u64) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    let before = items.len();

    let unique: Vec<T> = items.into_iter().filter(|item| seen.insert(id(item))).collect();

    if unique.len() != before {
        tracing::debug!("Dropped {} duplicate entries", before - unique.len());
    }

    unique
}
