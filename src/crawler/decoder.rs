//! Decoder strategies
//!
//! A decoder turns the URL and raw body of a successful response into a typed
//! entity. Plain functions and closures with the right signature are decoders,
//! so most call sites never name a type.

use crate::DecodeError;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// Turns a response body into an entity
pub trait Decoder: Send + Sync + 'static {
    /// The value produced for a successfully decoded body
    type Entity: Send + 'static;

    fn decode(&self, url: &str, body: &[u8]) -> Result<Self::Entity, DecodeError>;
}

impl<F, T> Decoder for F
where
    F: Fn(&str, &[u8]) -> Result<T, DecodeError> + Send + Sync + 'static,
    T: Send + 'static,
{
    type Entity = T;

    fn decode(&self, url: &str, body: &[u8]) -> Result<T, DecodeError> {
        self(url, body)
    }
}

/// Decodes a JSON body into `T`
pub struct JsonDecoder<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDecoder<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Decoder for JsonDecoder<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Entity = T;

    fn decode(&self, url: &str, body: &[u8]) -> Result<T, DecodeError> {
        serde_json::from_slice(body).map_err(|source| DecodeError::Json {
            url: url.to_string(),
            source,
        })
    }
}
