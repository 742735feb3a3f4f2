//! URL handling module for Podcast-Catalog
//!
//! This module decodes identifiers and slugs out of directory link paths and
//! builds the canonical URLs the catalog links to.

mod path;

pub use path::{
    decode_id_segment, decode_slug_path, path_segments, GENRE_KIND_PREFIX, ID_PREFIX,
};

/// Builds the canonical directory URL for a genre
///
/// The name is lowercased; the id is appended after the `id` prefix.
///
/// # Examples
///
/// ```
/// use podcast_catalog::url::genre_url;
///
/// assert_eq!(
///     genre_url(1, "NAME"),
///     "https://podcasts.apple.com/us/genre/podcasts-name/id1"
/// );
/// ```
pub fn genre_url(id: u64, name: &str) -> String {
    format!(
        "https://podcasts.apple.com/us/genre/{}{}/{}{}",
        GENRE_KIND_PREFIX,
        name.to_lowercase(),
        ID_PREFIX,
        id
    )
}

/// Builds a lookup API URL: `<lookup_base>=<id>`
pub fn lookup_url(lookup_base: &str, id: u64) -> String {
    format!("{}={}", lookup_base, id)
}
