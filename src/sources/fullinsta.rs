//! fullinsta.photo hashtag mirror
//!
//! Placeholder for a second live source. It has no scraper yet and fails
//! every fetch, so `ProviderKind::default_chain` leaves it out.

use async_trait::async_trait;

use super::{ImageLocation, ImageProvider, SourceError, Tag};

/// Provider slot for the fullinsta.photo mirror
#[derive(Debug, Clone, Copy, Default)]
pub struct FullInstaProvider;

#[async_trait]
impl ImageProvider for FullInstaProvider {
    fn name(&self) -> &'static str {
        "fullinsta"
    }

    async fn fetch(&self, _tag: &Tag) -> Result<Vec<ImageLocation>, SourceError> {
        // TODO: scrape https://fullinsta.photo/hashtag/{tag}/ once its markup is mapped
        Err(SourceError::NotImplemented(self.name()))
    }
}
