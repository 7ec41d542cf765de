//! tagwall library
//!
//! Resolves image locations for a hashtag from live sources, falling back to
//! the last successful result cached on disk. Exposed for integration tests.

pub mod cache;
pub mod cli;
pub mod logging;
pub mod resolver;
pub mod rotation;
pub mod sources;

pub use cache::{CacheError, CacheStore};
pub use resolver::{ImageResolver, ResolveError};
pub use sources::{ImageLocation, ImageProvider, ProviderKind, SourceError, Tag};
