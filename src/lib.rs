//! Podcast-Catalog: a local catalog of podcast directory metadata
//!
//! This crate fetches genre and show directory pages plus the JSON lookup API
//! and turns them into genre, show and show-detail records. Every collector is
//! built on the concurrent fetch-and-decode engine in [`crawler`].

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod storage;
pub mod url;

use std::num::ParseIntError;
use thiserror::Error;

/// Main error type for Podcast-Catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    /// Non-2xx response; displays as the bare HTTP reason phrase
    #[error("{reason}")]
    HttpStatus {
        url: String,
        status: u16,
        reason: String,
    },

    /// Decoder failure, attributed to the URL that was fetched
    #[error("Failed to decode {url}: {source}")]
    Decode { url: String, source: DecodeError },

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Fetch task for {url} did not complete: {message}")]
    TaskFailed { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),
}

impl CatalogError {
    pub fn decode(url: impl Into<String>, source: DecodeError) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// The URL this error is attributed to, when there is one
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::InvalidUrl { url, .. }
            | Self::Transport { url, .. }
            | Self::HttpStatus { url, .. }
            | Self::Decode { url, .. }
            | Self::TaskFailed { url, .. } => Some(url),
            _ => None,
        }
    }
}

/// Failures raised by decoders while turning a response into an entity
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Failed to parse identifier \"{segment}\" in {url}: {source}")]
    InvalidId {
        url: String,
        segment: String,
        source: ParseIntError,
    },

    #[error("Identifier in {url} must be positive")]
    NonPositiveId { url: String },

    #[error("Malformed path in {url}: {reason}")]
    MalformedPath { url: String, reason: String },

    #[error("Invalid JSON from {url}: {source}")]
    Json {
        url: String,
        source: serde_json::Error,
    },

    #[error("Show is not found: {url}")]
    ShowNotFound { url: String },
}

impl DecodeError {
    /// The URL (or href) the failure is attributed to
    pub fn url(&self) -> &str {
        match self {
            Self::InvalidId { url, .. }
            | Self::NonPositiveId { url }
            | Self::MalformedPath { url, .. }
            | Self::Json { url, .. }
            | Self::ShowNotFound { url } => url,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Podcast-Catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::{Genre, Show, ShowDetails, ShowImage};
pub use config::Config;
pub use crawler::{Aggregate, Decoder, Dispatcher, Envelope, RequestOptions, ResultStream};
pub use crate::url::genre_url;
