//! Cache store for persisting image locations to disk
//!
//! Provides a `CacheStore` that writes each tag's image locations to
//! `<dir>/<tag>-imageUris.json` and reads them back as a fallback source.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::sources::{ImageLocation, Tag};

/// Suffix appended to the tag to form the cache file name
const CACHE_FILE_SUFFIX: &str = "-imageUris.json";

/// Errors that can occur when reading or writing the cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem access failed
    #[error("Cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The cache file is not a JSON array of absolute URIs
    #[error("Cache file is malformed: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Reads and writes cached image locations
///
/// The store holds no state besides its directory, so it is cheap to clone and
/// any two stores pointed at the same directory see the same files.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore {
    /// Creates a CacheStore in the platform temporary directory
    pub fn new() -> Self {
        Self {
            cache_dir: std::env::temp_dir(),
        }
    }

    /// Creates a CacheStore with a custom cache directory
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Directory this store writes to
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path of the cache file for the given tag
    pub fn path_for(&self, tag: &Tag) -> PathBuf {
        self.cache_dir.join(format!("{}{}", tag.as_str(), CACHE_FILE_SUFFIX))
    }

    /// Overwrites the cache file for a tag with the given locations
    ///
    /// Does nothing when `locations` is empty, so a previous non-empty result
    /// is never replaced by an empty one.
    ///
    /// # Returns
    /// * `Ok(true)` if the file was written
    /// * `Ok(false)` if `locations` was empty and the file was left untouched
    /// * `Err(CacheError)` if directory creation, serialization or writing fails
    pub fn write(&self, tag: &Tag, locations: &[ImageLocation]) -> Result<bool, CacheError> {
        if locations.is_empty() {
            return Ok(false);
        }

        fs::create_dir_all(&self.cache_dir)?;

        let path = self.path_for(tag);
        let json = serde_json::to_string(locations)?;
        fs::write(&path, json)?;

        debug!(path = %path.display(), count = locations.len(), "Wrote image cache");
        Ok(true)
    }

    /// Reads the cached locations for a tag
    ///
    /// # Returns
    /// * `Ok(None)` if no cache file exists for the tag
    /// * `Ok(Some(locations))` with the parsed contents, possibly empty
    /// * `Err(CacheError)` if the file cannot be read or is malformed
    pub fn read(&self, tag: &Tag) -> Result<Option<Vec<ImageLocation>>, CacheError> {
        let path = self.path_for(tag);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let locations: Vec<ImageLocation> = serde_json::from_str(&content)?;
        Ok(Some(locations))
    }

    /// Last modification time of the cache file for a tag, if it exists
    pub fn modified_at(&self, tag: &Tag) -> Option<DateTime<Utc>> {
        let modified = fs::metadata(self.path_for(tag)).ok()?.modified().ok()?;
        Some(DateTime::<Utc>::from(modified))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_cache() -> (CacheStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = CacheStore::with_dir(temp_dir.path());
        (cache, temp_dir)
    }

    fn locations(uris: &[&str]) -> Vec<ImageLocation> {
        uris.iter()
            .map(|uri| ImageLocation::parse(uri).expect("valid test URI"))
            .collect()
    }

    fn tag(name: &str) -> Tag {
        Tag::new(name).expect("valid test tag")
    }

    #[test]
    fn test_path_for_uses_tag_and_suffix() {
        let (cache, temp_dir) = create_test_cache();

        let path = cache.path_for(&tag("sunset"));

        assert_eq!(path, temp_dir.path().join("sunset-imageUris.json"));
    }

    #[test]
    fn test_new_uses_temp_dir() {
        let cache = CacheStore::new();

        assert_eq!(cache.dir(), std::env::temp_dir().as_path());
        assert!(cache
            .path_for(&tag("sunset"))
            .ends_with("sunset-imageUris.json"));
    }

    #[test]
    fn test_write_produces_compact_json_array() {
        let (cache, temp_dir) = create_test_cache();
        let uris = locations(&["https://cdn.example/a.jpg", "https://cdn.example/b.jpg"]);

        let written = cache.write(&tag("sunset"), &uris).expect("Write should succeed");

        assert!(written);
        let content = fs::read_to_string(temp_dir.path().join("sunset-imageUris.json"))
            .expect("Should read file");
        assert_eq!(
            content,
            r#"["https://cdn.example/a.jpg","https://cdn.example/b.jpg"]"#
        );
    }

    #[test]
    fn test_write_then_read_preserves_order() {
        let (cache, _temp_dir) = create_test_cache();
        let uris = locations(&[
            "https://cdn.example/c.jpg",
            "https://cdn.example/a.jpg",
            "https://cdn.example/c.jpg",
        ]);

        cache.write(&tag("sunset"), &uris).expect("Write should succeed");
        let read = cache.read(&tag("sunset")).expect("Read should succeed");

        assert_eq!(read, Some(uris));
    }

    #[test]
    fn test_write_then_read_keeps_uri_text_verbatim() {
        let (cache, temp_dir) = create_test_cache();
        let uris = locations(&["https://CDN.example", "https://cdn.example/a b.jpg"]);

        cache.write(&tag("sunset"), &uris).expect("Write should succeed");

        let content = fs::read_to_string(temp_dir.path().join("sunset-imageUris.json"))
            .expect("Should read file");
        assert_eq!(content, r#"["https://CDN.example","https://cdn.example/a b.jpg"]"#);
        let read = cache.read(&tag("sunset")).unwrap().expect("File should exist");
        assert_eq!(read[0].as_str(), "https://CDN.example");
        assert_eq!(read[1].as_str(), "https://cdn.example/a b.jpg");
    }

    #[test]
    fn test_write_skips_empty_locations() {
        let (cache, temp_dir) = create_test_cache();
        let path = temp_dir.path().join("sunset-imageUris.json");
        fs::write(&path, "sentinel").expect("Should seed file");

        let written = cache.write(&tag("sunset"), &[]).expect("Write should succeed");

        assert!(!written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "sentinel");
    }

    #[test]
    fn test_write_overwrites_existing_cache() {
        let (cache, _temp_dir) = create_test_cache();
        let first = locations(&["https://cdn.example/a.jpg", "https://cdn.example/b.jpg"]);
        let second = locations(&["https://cdn.example/z.jpg"]);

        cache.write(&tag("sunset"), &first).expect("First write should succeed");
        cache.write(&tag("sunset"), &second).expect("Second write should succeed");

        assert_eq!(cache.read(&tag("sunset")).unwrap(), Some(second));
    }

    #[test]
    fn test_write_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("cache");
        let cache = CacheStore::with_dir(&nested_path);

        cache
            .write(&tag("sunset"), &locations(&["https://cdn.example/a.jpg"]))
            .expect("Write should succeed");

        assert!(nested_path.join("sunset-imageUris.json").exists());
    }

    #[test]
    fn test_read_returns_none_for_missing_file() {
        let (cache, _temp_dir) = create_test_cache();

        let result = cache.read(&tag("ghosttag")).expect("Read should succeed");

        assert!(result.is_none());
    }

    #[test]
    fn test_read_returns_empty_array_as_empty() {
        let (cache, temp_dir) = create_test_cache();
        fs::write(temp_dir.path().join("sunset-imageUris.json"), "[]").unwrap();

        let result = cache.read(&tag("sunset")).expect("Read should succeed");

        assert_eq!(result, Some(Vec::new()));
    }

    #[test]
    fn test_read_fails_on_malformed_json() {
        let (cache, temp_dir) = create_test_cache();
        fs::write(temp_dir.path().join("sunset-imageUris.json"), "{not json").unwrap();

        let err = cache.read(&tag("sunset")).unwrap_err();

        assert!(matches!(err, CacheError::ParseError(_)));
    }

    #[test]
    fn test_read_fails_on_relative_uri() {
        let (cache, temp_dir) = create_test_cache();
        fs::write(
            temp_dir.path().join("sunset-imageUris.json"),
            r#"["https://cdn.example/a.jpg","b.jpg"]"#,
        )
        .unwrap();

        let err = cache.read(&tag("sunset")).unwrap_err();

        assert!(matches!(err, CacheError::ParseError(_)));
    }

    #[test]
    fn test_tags_do_not_share_files() {
        let (cache, _temp_dir) = create_test_cache();
        cache
            .write(&tag("sunset"), &locations(&["https://cdn.example/a.jpg"]))
            .unwrap();

        assert!(cache.read(&tag("sunrise")).unwrap().is_none());
    }

    #[test]
    fn test_modified_at_tracks_file_presence() {
        let (cache, _temp_dir) = create_test_cache();
        assert!(cache.modified_at(&tag("sunset")).is_none());

        let before = Utc::now() - chrono::Duration::seconds(5);
        cache
            .write(&tag("sunset"), &locations(&["https://cdn.example/a.jpg"]))
            .unwrap();

        let modified = cache.modified_at(&tag("sunset")).expect("File should exist");
        assert!(modified >= before);
    }
}
