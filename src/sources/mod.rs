//! Image sources for a hashtag
//!
//! This module contains the core data types shared by every source (tags and
//! image locations) and the `ImageProvider` trait that live sources implement.
//! Providers are listed in `ProviderKind`; only the kinds returned by
//! `ProviderKind::default_chain` take part in a normal resolution.

pub mod fullinsta;
pub mod instagram;

pub use fullinsta::FullInstaProvider;
pub use instagram::{extract_image_locations, InstagramProvider};

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use url::Url;

/// User agent sent with live requests; the tag pages refuse obvious bots
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Error returned when a tag fails validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    /// The tag was empty after trimming whitespace
    #[error("Tag must not be empty")]
    Empty,
}

/// Errors that can occur while fetching from a live source
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed, including non-success status codes
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The embedded payload was not valid JSON of the expected shape
    #[error("Failed to parse page payload: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The page did not contain the embedded shared data script
    #[error("Page does not contain an embedded window._sharedData payload")]
    MarkerNotFound,

    /// The provider exists but has no implementation
    #[error("The {0} provider is not implemented")]
    NotImplemented(&'static str),
}

/// A hashtag-like topic identifier
///
/// Always non-empty and free of surrounding whitespace. The tag is embedded
/// verbatim into request paths and cache file names, so callers are expected
/// to supply a path-safe value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    /// Creates a tag, trimming surrounding whitespace
    ///
    /// # Returns
    /// * `Ok(Tag)` if the trimmed value is non-empty
    /// * `Err(TagError::Empty)` otherwise
    pub fn new(value: impl AsRef<str>) -> Result<Self, TagError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TagError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the tag as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An absolute URI pointing at a remote image
///
/// Keeps the text exactly as it was supplied, so a location read from a page
/// is written to the cache and printed without normalization. Serializes as a
/// plain JSON string. Deserialization rejects anything that does not parse as
/// an absolute URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageLocation {
    raw: String,
    url: Url,
}

impl ImageLocation {
    /// Parses an absolute URI
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(input)?;
        Ok(Self {
            raw: input.to_string(),
            url,
        })
    }

    /// Returns the location as originally written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Scheme of the parsed URI
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }
}

impl fmt::Display for ImageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for ImageLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ImageLocation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ImageLocation::parse(&raw).map_err(|e| {
            serde::de::Error::custom(format!("invalid image URI '{}': {}", raw, e))
        })
    }
}

/// A live source of image locations for a tag
///
/// An empty collection means the source had nothing to offer and the next
/// source should be tried. An error means the source failed outright and the
/// resolution must stop.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Short human-readable name used in logs
    fn name(&self) -> &'static str;

    /// Fetches image locations for the given tag, preserving source order
    async fn fetch(&self, tag: &Tag) -> Result<Vec<ImageLocation>, SourceError>;
}

/// Every live provider known to the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Public Instagram hashtag page
    Instagram,
    /// fullinsta.photo hashtag mirror (not implemented)
    FullInsta,
}

impl ProviderKind {
    /// Providers tried during a normal resolution, in order
    ///
    /// `FullInsta` is deliberately absent until it has an implementation.
    pub fn default_chain() -> &'static [ProviderKind] {
        &[ProviderKind::Instagram]
    }

    /// Builds a provider of this kind on top of a shared HTTP client
    pub fn build(self, client: Client) -> Box<dyn ImageProvider> {
        match self {
            ProviderKind::Instagram => Box::new(InstagramProvider::with_client(client)),
            ProviderKind::FullInsta => Box::new(FullInstaProvider),
        }
    }
}

/// Builds the HTTP client shared by live providers
///
/// # Arguments
/// * `timeout` - Optional overall request timeout; `None` waits indefinitely
pub fn http_client(timeout: Option<Duration>) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("text/html"));

    let mut builder = Client::builder().default_headers(headers);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}
