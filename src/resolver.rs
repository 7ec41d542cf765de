//! Image location resolution with cache fallback
//!
//! `ImageResolver` walks its live providers in order and returns the first
//! non-empty result, writing it through to the cache. When every live provider
//! comes up empty it falls back to the cached result of a previous run.
//!
//! Only emptiness is recovered from. A provider error or an unreadable cache
//! file ends the resolution immediately.

use thiserror::Error;
use tracing::{info, warn};

use crate::cache::{CacheError, CacheStore};
use crate::sources::{ImageLocation, ImageProvider, SourceError, Tag};

/// Errors that can occur while resolving image locations
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A live source failed outright (transport or payload error)
    #[error("Live source failed: {0}")]
    Source(#[from] SourceError),

    /// The cache could not be read or written
    #[error("Local cache failed: {0}")]
    Cache(#[from] CacheError),

    /// Neither the live sources nor the cache produced any image
    #[error(
        "Unable to resolve images for tag '{tag}': the live source returned nothing and the \
         local cache is missing or empty. The page may now require authentication, or the \
         cache file may be corrupted or empty."
    )]
    Unresolved {
        /// Tag that could not be resolved
        tag: String,
    },
}

/// Resolves image locations for a single tag
///
/// Owns its providers and cache store; build one per tag at application
/// start-up and pass it where it is needed.
pub struct ImageResolver {
    tag: Tag,
    /// Live sources, tried in order
    providers: Vec<Box<dyn ImageProvider>>,
    cache: CacheStore,
}

impl ImageResolver {
    /// Creates a resolver that tries `providers` in order before the cache
    pub fn new(tag: Tag, providers: Vec<Box<dyn ImageProvider>>, cache: CacheStore) -> Self {
        Self {
            tag,
            providers,
            cache,
        }
    }

    /// Creates a resolver that only consults the cache
    pub fn offline(tag: Tag, cache: CacheStore) -> Self {
        Self::new(tag, Vec::new(), cache)
    }

    /// The tag this resolver serves
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// The cache store used for fallback and write-through
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Resolves the image locations for the tag
    ///
    /// # Returns
    /// * `Ok(locations)` - A non-empty collection in source order
    /// * `Err(ResolveError::Source)` - A live provider failed
    /// * `Err(ResolveError::Cache)` - The cache could not be written or read
    /// * `Err(ResolveError::Unresolved)` - Every source was empty or absent
    pub async fn resolve(&self) -> Result<Vec<ImageLocation>, ResolveError> {
        if let Some(locations) = self.try_live_sources().await? {
            return Ok(locations);
        }

        if let Some(locations) = self.try_cache()? {
            return Ok(locations);
        }

        Err(ResolveError::Unresolved {
            tag: self.tag.to_string(),
        })
    }

    /// Tries each live provider, writing the first non-empty result to the cache
    async fn try_live_sources(&self) -> Result<Option<Vec<ImageLocation>>, ResolveError> {
        for provider in &self.providers {
            let locations = provider.fetch(&self.tag).await?;

            if locations.is_empty() {
                warn!(
                    provider = provider.name(),
                    tag = %self.tag,
                    "Live source returned no images"
                );
                continue;
            }

            self.cache.write(&self.tag, &locations)?;
            info!(
                provider = provider.name(),
                tag = %self.tag,
                count = locations.len(),
                "Populated images from live source"
            );
            return Ok(Some(locations));
        }

        Ok(None)
    }

    /// Reads the previous result from the cache, treating empty as absent
    fn try_cache(&self) -> Result<Option<Vec<ImageLocation>>, ResolveError> {
        let Some(locations) = self.cache.read(&self.tag)? else {
            warn!(tag = %self.tag, "No cached images found");
            return Ok(None);
        };

        if locations.is_empty() {
            warn!(tag = %self.tag, "Cached image list is empty");
            return Ok(None);
        }

        let cached_at = self
            .cache
            .modified_at(&self.tag)
            .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        info!(
            tag = %self.tag,
            count = locations.len(),
            %cached_at,
            "Populated images from previous results"
        );
        Ok(Some(locations))
    }
}
