use crate::DecodeError;
use url::Url;

/// Prefix of the slug segment on genre directory links
pub const GENRE_KIND_PREFIX: &str = "podcasts-";

/// Prefix of the identifier segment on directory links
pub const ID_PREFIX: &str = "id";

/// Splits a link into its non-empty path segments
///
/// Absolute URLs are parsed so that query strings and fragments are ignored.
/// Anything that does not parse is split on `/` after dropping the query and
/// fragment by hand.
pub fn path_segments(href: &str) -> Vec<String> {
    if let Ok(url) = Url::parse(href) {
        if let Some(segments) = url.path_segments() {
            return segments
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    let path = href.split(['?', '#']).next().unwrap_or_default();
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses an identifier segment such as `id123`
///
/// The `id` prefix is stripped when present. The remainder must be a positive
/// integer; the error names the offending remainder and the link it came from.
pub fn decode_id_segment(href: &str, segment: &str) -> Result<u64, DecodeError> {
    let digits = segment.strip_prefix(ID_PREFIX).unwrap_or(segment);

    let id = digits
        .parse::<u64>()
        .map_err(|source| DecodeError::InvalidId {
            url: href.to_string(),
            segment: digits.to_string(),
            source,
        })?;

    if id == 0 {
        return Err(DecodeError::NonPositiveId {
            url: href.to_string(),
        });
    }

    Ok(id)
}

/// Decodes `.../<kind_prefix><slug>/id<N>` into `(N, slug)`
///
/// # Examples
///
/// ```
/// use podcast_catalog::url::{decode_slug_path, GENRE_KIND_PREFIX};
///
/// let href = "http://x.com/podcasts-test1-first/id1";
/// let (id, name) = decode_slug_path(href, GENRE_KIND_PREFIX).unwrap();
/// assert_eq!(id, 1);
/// assert_eq!(name, "test1-first");
/// ```
pub fn decode_slug_path(href: &str, kind_prefix: &str) -> Result<(u64, String), DecodeError> {
    let segments = path_segments(href);

    let [.., slug_segment, id_segment] = segments.as_slice() else {
        return Err(DecodeError::MalformedPath {
            url: href.to_string(),
            reason: "expected a slug segment followed by an id segment".to_string(),
        });
    };

    let name = slug_segment
        .strip_prefix(kind_prefix)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| DecodeError::MalformedPath {
            url: href.to_string(),
            reason: format!(
                "segment '{}' does not start with '{}'",
                slug_segment, kind_prefix
            ),
        })?;

    let id = decode_id_segment(href, id_segment)?;

    Ok((id, name.to_string()))
}
