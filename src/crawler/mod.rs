//! Crawler module: the concurrent fetch-and-decode engine
//!
//! This module contains everything collectors build on:
//! - HTTP fetching without retries
//! - Decoder strategies for response bodies
//! - Staggered, concurrent dispatch of URL batches
//! - Result envelopes, the result stream and its aggregation
//! - HTML link extraction and directory listing fetches

mod decoder;
mod dispatcher;
mod extractor;
mod fetcher;
mod listing;
mod scheduler;
mod stream;

pub use decoder::{Decoder, JsonDecoder};
pub use dispatcher::{fetch_entity, Dispatcher, RequestOptions};
pub use extractor::{extract_anchors, Anchor, LinkSelector};
pub use fetcher::{build_http_client, fetch_body, status_error};
pub use listing::{fetch_listing, fetch_listing_with, ListingDecoder};
pub use scheduler::StartSchedule;
pub use stream::{Aggregate, Envelope, ResultStream};
