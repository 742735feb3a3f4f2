//! HTTP fetcher implementation
//!
//! This module owns the transport side of the crawler:
//! - Building the shared HTTP client with a descriptive user agent
//! - Issuing a single GET per URL, without retries
//! - Classifying failures into transport and status errors

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::CatalogError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// The client is cheap to clone and pools connections internally, so one
/// instance is shared by every concurrent fetch task. Timeouts configured
/// here are the only deadline a request is subject to.
///
/// # Example
///
/// ```no_run
/// use podcast_catalog::config::{CrawlerConfig, UserAgentConfig};
/// use podcast_catalog::crawler::build_http_client;
///
/// let user_agent = UserAgentConfig {
///     crawler_name: "PodcastCatalog".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&user_agent, &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, CatalogError> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        user_agent.crawler_name,
        user_agent.crawler_version,
        user_agent.contact_url,
        user_agent.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(crawler.request_timeout))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(CatalogError::Client)
}

/// Fetches a URL and returns its body
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | URL does not parse | `InvalidUrl` |
/// | DNS, connect, timeout, body read | `Transport` |
/// | Any non-2xx status | `HttpStatus` (displays as the reason phrase) |
pub async fn fetch_body(client: &Client, url: &str) -> Result<Vec<u8>, CatalogError> {
    let parsed = Url::parse(url).map_err(|source| CatalogError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|source| transport_error(url, source))?;

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("{} answered {}", url, status);
        return Err(status_error(url, status));
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| transport_error(url, source))?;

    Ok(body.to_vec())
}

/// Maps a non-success status to an error carrying the exact reason phrase
///
/// Codes without a registered phrase are reported by their number.
pub fn status_error(url: &str, status: StatusCode) -> CatalogError {
    let reason = match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => status.as_str().to_string(),
    };

    CatalogError::HttpStatus {
        url: url.to_string(),
        status: status.as_u16(),
        reason,
    }
}

fn transport_error(url: &str, source: reqwest::Error) -> CatalogError {
    if source.is_timeout() {
        tracing::debug!("Request timeout for {}", url);
    } else if source.is_connect() {
        tracing::debug!("Connection failed for {}", url);
    }

    CatalogError::Transport {
        url: url.to_string(),
        source,
    }
}
