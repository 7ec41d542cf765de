//! tagwall - Fetch image locations for a hashtag
//!
//! Resolves the images posted under a hashtag and prints their locations,
//! either all at once or one per interval. When the live page yields nothing,
//! the result of the last successful run is used instead.

use std::io;
use std::process;

use clap::Parser;
use tracing::debug;

use tagwall::cli::{Cli, StartupConfig};
use tagwall::rotation::{ctrl_c_shutdown, run_rotation, Rotation};
use tagwall::sources::{http_client, ImageProvider};
use tagwall::{logging, CacheStore, ImageResolver, ProviderKind};

/// Assembles the resolver from the startup configuration
fn build_resolver(config: &StartupConfig) -> Result<ImageResolver, reqwest::Error> {
    let cache = config
        .cache_dir
        .clone()
        .map(CacheStore::with_dir)
        .unwrap_or_default();

    if config.offline {
        return Ok(ImageResolver::offline(config.tag.clone(), cache));
    }

    let client = http_client(config.timeout)?;
    let providers: Vec<Box<dyn ImageProvider>> = ProviderKind::default_chain()
        .iter()
        .map(|kind| kind.build(client.clone()))
        .collect();

    Ok(ImageResolver::new(config.tag.clone(), providers, cache))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    };

    logging::init_logging(config.verbose);

    let resolver = build_resolver(&config)?;
    debug!(
        tag = %resolver.tag(),
        cache = %resolver.cache().path_for(resolver.tag()).display(),
        offline = config.offline,
        "Resolving images"
    );

    let locations = match resolver.resolve().await {
        Ok(locations) => locations,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let Some(period) = config.rotate_every else {
        for location in &locations {
            println!("{}", location);
        }
        return Ok(());
    };

    if let Some(rotation) = Rotation::new(locations) {
        run_rotation(rotation, period, &mut io::stdout(), ctrl_c_shutdown()).await?;
    }

    Ok(())
}
