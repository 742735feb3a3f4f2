//! HTML link extraction
//!
//! Directory pages are parsed tolerantly: malformed markup never fails the
//! extraction, elements that cannot be read are simply missing from the
//! result. Anchors come back in document order.

use crate::CatalogError;
use scraper::{Html, Selector};

/// An anchor matched on a directory page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// The raw `href` attribute
    pub href: String,

    /// Visible text with surrounding whitespace trimmed
    pub text: String,
}

/// A compiled selector pattern for link extraction
#[derive(Debug, Clone)]
pub struct LinkSelector {
    pattern: String,
    selector: Selector,
}

impl LinkSelector {
    /// Compiles a CSS selector pattern such as `.target` or `#nav a`
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Selector` when the pattern is not a valid selector.
    pub fn parse(pattern: &str) -> Result<Self, CatalogError> {
        let selector = Selector::parse(pattern).map_err(|e| CatalogError::Selector {
            selector: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            selector,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns every matched element carrying an `href`, in document order
    ///
    /// # Example
    ///
    /// ```
    /// use podcast_catalog::crawler::LinkSelector;
    ///
    /// let selector = LinkSelector::parse(".target").unwrap();
    /// let anchors = selector.extract(r#"<a class="target" href="/id1"> One </a>"#);
    /// assert_eq!(anchors[0].href, "/id1");
    /// assert_eq!(anchors[0].text, "One");
    /// ```
    pub fn extract(&self, body: &str) -> Vec<Anchor> {
        let document = Html::parse_document(body);

        document
            .select(&self.selector)
            .filter_map(|element| {
                let href = element.value().attr("href")?.trim();
                if href.is_empty() {
                    return None;
                }

                Some(Anchor {
                    href: href.to_string(),
                    text: element.text().collect::<String>().trim().to_string(),
                })
            })
            .collect()
    }
}

/// Convenience function compiling `pattern` and extracting from `body`
pub fn extract_anchors(body: &str, pattern: &str) -> Result<Vec<Anchor>, CatalogError> {
    Ok(LinkSelector::parse(pattern)?.extract(body))
}
