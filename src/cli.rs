//! Command-line interface parsing for tagwall
//!
//! This module handles parsing of CLI arguments using clap and validates them
//! into a `StartupConfig` that the application is assembled from.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::sources::{Tag, TagError};

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The tag argument was empty or blank
    #[error("Invalid tag: {0}")]
    InvalidTag(#[from] TagError),

    /// The rotation interval was zero or too large to represent
    #[error("Invalid interval: '{0}'. Minutes between images must be a positive number that fits in a duration")]
    InvalidInterval(u64),

    /// The request timeout was zero
    #[error("Invalid timeout: '{0}'. Seconds must be a positive number")]
    InvalidTimeout(u64),
}

/// tagwall - Fetch image locations for a hashtag
#[derive(Parser, Debug)]
#[command(name = "tagwall")]
#[command(about = "Resolve image locations for a hashtag, falling back to the last good result")]
#[command(version)]
pub struct Cli {
    /// Hashtag to fetch images for, without the leading '#'
    #[arg(value_name = "TAG")]
    pub tag: String,

    /// Directory holding the cache file (defaults to the system temp directory)
    #[arg(long, value_name = "DIR", env = "TAGWALL_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Skip live sources and use the cached result only
    #[arg(long)]
    pub offline: bool,

    /// Print one image every MINUTES instead of listing them all
    ///
    /// Examples:
    ///   tagwall sunset --every 15   # Show a new image every 15 minutes
    #[arg(long, value_name = "MINUTES")]
    pub every: Option<u64>,

    /// Give up on the live request after SECONDS (no timeout by default)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Tag to resolve
    pub tag: Tag,
    /// Cache directory override
    pub cache_dir: Option<PathBuf>,
    /// Whether live sources are skipped
    pub offline: bool,
    /// Rotation period, if rotating
    pub rotate_every: Option<Duration>,
    /// Live request timeout
    pub timeout: Option<Duration>,
    /// Whether debug logging is enabled
    pub verbose: bool,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if the tag is blank or a duration is zero or overflows
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let tag = Tag::new(&cli.tag)?;

        let rotate_every = match cli.every {
            None => None,
            Some(0) => return Err(CliError::InvalidInterval(0)),
            Some(minutes) => Some(
                minutes
                    .checked_mul(60)
                    .map(Duration::from_secs)
                    .ok_or(CliError::InvalidInterval(minutes))?,
            ),
        };

        let timeout = match cli.timeout {
            None => None,
            Some(0) => return Err(CliError::InvalidTimeout(0)),
            Some(seconds) => Some(Duration::from_secs(seconds)),
        };

        Ok(StartupConfig {
            tag,
            cache_dir: cli.cache_dir.clone(),
            offline: cli.offline,
            rotate_every,
            timeout,
            verbose: cli.verbose,
        })
    }
}
