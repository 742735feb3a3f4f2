//! Concurrent request dispatcher
//!
//! The dispatcher spawns one task per URL. Each task waits for its start
//! offset, fetches the URL once and runs the decoder on a 2xx body. Outcomes
//! are sent, in completion order, on a channel sized to the batch so no task
//! ever waits on a slow consumer.

use crate::crawler::decoder::Decoder;
use crate::crawler::fetcher::fetch_body;
use crate::crawler::scheduler::StartSchedule;
use crate::crawler::stream::{Envelope, ResultStream};
use crate::CatalogError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Options for a batch of requests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Absolute URLs to fetch
    pub urls: Vec<String>,

    /// Selector used by HTML decoders, when the batch targets directory pages
    pub selector: Option<String>,

    /// Delay between the starts of successive requests
    pub min_interval: Duration,
}

impl RequestOptions {
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            urls,
            ..Self::default()
        }
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }
}

/// Fans a batch of URLs out to concurrent fetch tasks
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Client,
}

impl Dispatcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Dispatches every URL and returns the stream their envelopes arrive on
    ///
    /// Must be called from within a tokio runtime. The call itself never
    /// waits: staggered tasks sleep on their own.
    ///
    /// # Guarantees
    ///
    /// - Exactly one envelope per URL, including invalid URLs and panicking decoders
    /// - A failing URL never cancels or delays any other URL
    /// - No retries; timeouts are whatever the client enforces
    pub fn dispatch<D>(
        &self,
        urls: Vec<String>,
        min_interval: Duration,
        decoder: D,
    ) -> ResultStream<D::Entity>
    where
        D: Decoder,
    {
        let expected = urls.len();
        // mpsc::channel panics on zero capacity
        let (sender, receiver) = mpsc::channel(expected.max(1));
        let decoder = Arc::new(decoder);
        let schedule = StartSchedule::new(min_interval);
        let origin = Instant::now();

        tracing::debug!(
            "Dispatching {} requests (start interval {:?})",
            expected,
            schedule.interval()
        );

        for (index, url) in urls.into_iter().enumerate() {
            let offset = schedule.offset(index);
            let client = self.client.clone();
            let decoder = Arc::clone(&decoder);
            let sender = sender.clone();

            tokio::spawn(async move {
                let task_url = url.clone();
                let task = tokio::spawn(async move {
                    let delay = offset.saturating_sub(origin.elapsed());
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    fetch_entity(&client, &task_url, decoder.as_ref()).await
                });

                // A panicking decoder must still account for its URL
                let outcome = match task.await {
                    Ok(outcome) => outcome,
                    Err(e) => Err(CatalogError::TaskFailed {
                        url: url.clone(),
                        message: e.to_string(),
                    }),
                };

                if let Err(e) = &outcome {
                    tracing::debug!("Request for {} failed: {}", url, e);
                }

                if sender.send(Envelope::new(url, outcome)).await.is_err() {
                    tracing::trace!("Result stream dropped before delivery");
                }
            });
        }

        ResultStream::new(receiver, expected)
    }

    /// Dispatches the URLs and interval carried by `options`
    pub fn dispatch_options<D>(
        &self,
        options: &RequestOptions,
        decoder: D,
    ) -> ResultStream<D::Entity>
    where
        D: Decoder,
    {
        self.dispatch(options.urls.clone(), options.min_interval, decoder)
    }
}

/// Fetches one URL and decodes a successful body
pub async fn fetch_entity<D>(
    client: &Client,
    url: &str,
    decoder: &D,
) -> Result<D::Entity, CatalogError>
where
    D: Decoder + ?Sized,
{
    tracing::debug!("Fetching {}", url);
    let body = fetch_body(client, url).await?;
    decoder.decode(url, &body).map_err(|source| {
        tracing::debug!("Decoding {} failed at {}", url, source.url());
        CatalogError::decode(url, source)
    })
}
