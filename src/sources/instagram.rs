//! Instagram hashtag page provider
//!
//! Fetches the public explore page for a tag and pulls image locations out of
//! the `window._sharedData` script embedded in the HTML. The page structure is
//! not a stable API, so the extraction is kept in a pure function that can be
//! exercised against captured markup.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{ImageLocation, ImageProvider, SourceError, Tag};

/// Base URL for hashtag explore pages
const INSTAGRAM_TAGS_BASE_URL: &str = "https://www.instagram.com/explore/tags";

/// Escape sequence the page uses for ampersands inside the payload
const ESCAPED_AMPERSAND: &str = r"\u0026";

/// Matches the embedded script and captures the JSON between the marker and `;`
fn shared_data_regex() -> &'static Regex {
    static SHARED_DATA: OnceLock<Regex> = OnceLock::new();
    SHARED_DATA.get_or_init(|| {
        Regex::new(r#"<script type="text/javascript">window\._sharedData = (.*?);</script>"#)
            .expect("shared data pattern is valid")
    })
}

/// Top level of the embedded payload
#[derive(Debug, Deserialize)]
struct SharedData {
    entry_data: EntryData,
}

#[derive(Debug, Deserialize)]
struct EntryData {
    /// Present only when the page rendered a tag page (absent behind the login wall)
    #[serde(rename = "TagPage", default)]
    tag_page: Option<Vec<TagPage>>,
}

#[derive(Debug, Deserialize)]
struct TagPage {
    graphql: Graphql,
}

#[derive(Debug, Deserialize)]
struct Graphql {
    hashtag: Hashtag,
}

#[derive(Debug, Deserialize)]
struct Hashtag {
    edge_hashtag_to_media: MediaConnection,
}

#[derive(Debug, Deserialize)]
struct MediaConnection {
    edges: Vec<MediaEdge>,
}

#[derive(Debug, Deserialize)]
struct MediaEdge {
    node: MediaNode,
}

#[derive(Debug, Deserialize)]
struct MediaNode {
    display_url: ImageLocation,
}

/// Extracts image locations from a hashtag page
///
/// # Arguments
/// * `html` - The raw HTML of the explore page
///
/// # Returns
/// * `Ok(Vec<ImageLocation>)` - Display URLs of the first tag page, in page order.
///   Empty when the payload has no tag page or the tag page has no media.
/// * `Err(SourceError::MarkerNotFound)` - If the shared data script is missing
/// * `Err(SourceError::ParseError)` - If the payload is not the expected JSON
pub fn extract_image_locations(html: &str) -> Result<Vec<ImageLocation>, SourceError> {
    let captures = shared_data_regex()
        .captures(html)
        .ok_or(SourceError::MarkerNotFound)?;
    let payload = captures[1].replace(ESCAPED_AMPERSAND, "&");

    let shared_data: SharedData = serde_json::from_str(&payload)?;

    let Some(tag_page) = shared_data
        .entry_data
        .tag_page
        .and_then(|pages| pages.into_iter().next())
    else {
        return Ok(Vec::new());
    };

    Ok(tag_page
        .graphql
        .hashtag
        .edge_hashtag_to_media
        .edges
        .into_iter()
        .map(|edge| edge.node.display_url)
        .collect())
}

/// Provider backed by the public Instagram hashtag page
#[derive(Debug, Clone)]
pub struct InstagramProvider {
    client: Client,
    /// Base URL for tag pages (allows override for testing)
    base_url: String,
}

impl InstagramProvider {
    /// Create a provider that issues requests through the given client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: INSTAGRAM_TAGS_BASE_URL.to_string(),
        }
    }

    /// Replace the base URL that tag pages are requested from
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builds the explore page URL for a tag
    ///
    /// The tag is embedded as-is; it is not percent-encoded.
    pub fn page_url(&self, tag: &Tag) -> String {
        format!("{}/{}/", self.base_url, tag)
    }
}

#[async_trait]
impl ImageProvider for InstagramProvider {
    fn name(&self) -> &'static str {
        "instagram"
    }

    async fn fetch(&self, tag: &Tag) -> Result<Vec<ImageLocation>, SourceError> {
        let url = self.page_url(tag);
        debug!(%url, "Requesting hashtag page");

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let html = response.text().await?;

        let locations = extract_image_locations(&html)?;
        debug!(count = locations.len(), "Extracted image locations from hashtag page");
        Ok(locations)
    }
}
