//! Result envelopes and the stream that delivers them
//!
//! Every dispatched URL produces exactly one [`Envelope`]. A [`ResultStream`]
//! knows how many envelopes to expect and reports exhaustion only once all of
//! them have arrived. [`Aggregate`] is the drained, partitioned form that
//! collectors work with.

use crate::CatalogError;
use tokio::sync::mpsc;

/// Outcome of fetching and decoding a single URL
#[derive(Debug)]
pub struct Envelope<T> {
    url: String,
    outcome: Result<T, CatalogError>,
}

impl<T> Envelope<T> {
    pub fn new(url: impl Into<String>, outcome: Result<T, CatalogError>) -> Self {
        Self {
            url: url.into(),
            outcome,
        }
    }

    /// The URL this envelope was produced for
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn entity(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&CatalogError> {
        self.outcome.as_ref().err()
    }

    pub fn into_result(self) -> Result<T, CatalogError> {
        self.outcome
    }

}

/// Envelopes in completion order, one per dispatched URL
#[derive(Debug)]
pub struct ResultStream<T> {
    receiver: mpsc::Receiver<Envelope<T>>,
    expected: usize,
    received: usize,
}

impl<T> ResultStream<T> {
    pub(crate) fn new(receiver: mpsc::Receiver<Envelope<T>>, expected: usize) -> Self {
        Self {
            receiver,
            expected,
            received: 0,
        }
    }

    /// Number of URLs dispatched into this stream
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Number of envelopes still to arrive
    pub fn remaining(&self) -> usize {
        self.expected - self.received
    }

    pub fn is_exhausted(&self) -> bool {
        self.received == self.expected
    }

    /// Waits for the next envelope
    ///
    /// Returns `None` once one envelope per dispatched URL has been received.
    pub async fn next(&mut self) -> Option<Envelope<T>> {
        if self.is_exhausted() {
            return None;
        }

        let envelope = self.receiver.recv().await?;
        self.received += 1;
        Some(envelope)
    }

    /// Drains the stream and partitions envelopes into successes and failures
    ///
    /// Never stops early: every failure is kept alongside every success.
    pub async fn partition(mut self) -> Aggregate<T> {
        let mut aggregate = Aggregate::with_capacity(self.expected);

        while let Some(envelope) = self.next().await {
            aggregate.push(envelope);
        }

        if !self.is_exhausted() {
            tracing::error!(
                "Result stream closed with {} of {} envelopes missing",
                self.remaining(),
                self.expected
            );
        }

        aggregate
    }
}

/// Successes and failures of a batch, kept as two owned collections
#[derive(Debug)]
pub struct Aggregate<T> {
    pub successes: Vec<T>,
    pub failures: Vec<CatalogError>,
}

impl<T> Aggregate<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            successes: Vec::with_capacity(capacity),
            failures: Vec::new(),
        }
    }

    /// Files an envelope under successes or failures
    pub fn push(&mut self, envelope: Envelope<T>) {
        match envelope.into_result() {
            Ok(entity) => self.successes.push(entity),
            Err(err) => self.failures.push(err),
        }
    }

    /// Total number of outcomes recorded
    pub fn len(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Aggregate<Vec<T>> {
    /// Flattens per-page entity lists into one list
    pub fn flatten(self) -> Aggregate<T> {
        Aggregate {
            successes: self.successes.into_iter().flatten().collect(),
            failures: self.failures,
        }
    }
}

impl<T> Default for Aggregate<T> {
    fn default() -> Self {
        Self::new()
    }
}
