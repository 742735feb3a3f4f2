use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Podcast-Catalog
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    pub output: OutputConfig,
}

/// Request dispatch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Delay between the starts of successive requests in a batch (milliseconds)
    #[serde(rename = "min-interval", default)]
    pub min_interval: u64,

    /// Whole-request timeout enforced by the HTTP client (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout", default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl CrawlerConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            min_interval: 0,
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Remote directory and lookup API locations
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Directory page listing every genre
    #[serde(rename = "genres-url", default = "default_genres_url")]
    pub genres_url: String,

    /// Selector matching genre anchors on the genres page
    #[serde(rename = "genre-selector", default = "default_genre_selector")]
    pub genre_selector: String,

    /// Selector matching show anchors on a genre page
    #[serde(rename = "show-selector", default = "default_show_selector")]
    pub show_selector: String,

    /// Lookup endpoint up to (not including) the `=<id>` suffix
    #[serde(rename = "lookup-base", default = "default_lookup_base")]
    pub lookup_base: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            genres_url: default_genres_url(),
            genre_selector: default_genre_selector(),
            show_selector: default_show_selector(),
            lookup_base: default_lookup_base(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the genres JSON file
    #[serde(rename = "genres-path")]
    pub genres_path: String,

    /// Path to the shows JSON file
    #[serde(rename = "shows-path")]
    pub shows_path: String,

    /// Path to the show details JSON file
    #[serde(rename = "details-path")]
    pub details_path: String,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_genres_url() -> String {
    "https://podcasts.apple.com/us/genre/podcasts/id26".to_string()
}

fn default_genre_selector() -> String {
    "#genre-nav .top-level-genre".to_string()
}

fn default_show_selector() -> String {
    "#selectedcontent a".to_string()
}

fn default_lookup_base() -> String {
    "https://itunes.apple.com/lookup?id".to_string()
}
