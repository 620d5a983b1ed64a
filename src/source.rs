//! The content source: where moments come from.
//!
//! [`ContentSource`] is the only boundary to the outside world. The live
//! implementation, [`HttpContentSource`], issues a single
//! `GET {base}/api/moments?populate=image` per call, bypassing intermediate
//! caches, and decodes the `{ "data": [...] }` envelope. Tests substitute an
//! in-memory source.
//!
//! ## Decoding
//!
//! The envelope is strict, its elements are not:
//!
//! - body is not JSON, or not an object, or `data` is not an array → [`SourceError::Decode`]
//! - `data` missing or `null` → empty collection
//! - an element that is not a valid moment (no integer `id`, wrong field
//!   types) → skipped with a warning, the rest are kept

use crate::types::Moment;
use reqwest::{Client, header};
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

/// Path of the collection endpoint, relative to the base URL.
pub const MOMENTS_PATH: &str = "/api/moments?populate=image";

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("unexpected response shape from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Boxed future type alias keeping [`ContentSource`] dyn-compatible.
pub type MomentsFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<Moment>, SourceError>> + Send + 'a>>;

/// Fetches the full moment collection.
pub trait ContentSource: Send + Sync {
    /// Fetch every published moment, in source order.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// response body that is not a moment envelope.
    fn fetch_moments(&self) -> MomentsFuture<'_>;
}

/// Live content source backed by the content API over HTTP.
pub struct HttpContentSource {
    client: Client,
    url: String,
}

impl HttpContentSource {
    /// Create a source for the API at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SourceError::Client)?;
        Ok(Self {
            client,
            url: collection_url(base_url),
        })
    }

    /// The collection URL this source requests.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<Moment>, SourceError> {
        let transport = |source: reqwest::Error| SourceError::Transport {
            url: self.url.clone(),
            source,
        };

        tracing::debug!(url = %self.url, "fetching moments");
        let response = self
            .client
            .get(&self.url)
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::PRAGMA, "no-cache")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        decode_moments(&body).map_err(|source| SourceError::Decode {
            url: self.url.clone(),
            source,
        })
    }
}

impl ContentSource for HttpContentSource {
    fn fetch_moments(&self) -> MomentsFuture<'_> {
        Box::pin(self.fetch())
    }
}

/// Full collection URL for a content API base URL.
pub fn collection_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), MOMENTS_PATH)
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Vec<serde_json::Value>>,
}

/// Decode a collection response body.
pub fn decode_moments(body: &[u8]) -> Result<Vec<Moment>, serde_json::Error> {
    // A derived struct also accepts a JSON array; only an object is an envelope.
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(body)?;
    let envelope: Envelope = serde_json::from_value(serde_json::Value::Object(object))?;
    let entries = envelope.data.unwrap_or_default();
    let mut moments = Vec::with_capacity(entries.len());
    for (position, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Moment>(entry) {
            Ok(moment) => moments.push(moment),
            Err(e) => tracing::warn!(position, error = %e, "skipping malformed moment"),
        }
    }
    Ok(moments)
}
