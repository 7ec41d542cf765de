//! Timed rotation through resolved image locations
//!
//! Emits one image location per interval, cycling through the collection in
//! order. Whatever consumes the output (a wallpaper setter, a viewer) lives
//! outside this crate.

use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;

use tracing::{debug, warn};

use crate::sources::ImageLocation;

/// Cycles through a non-empty collection of image locations
#[derive(Debug, Clone)]
pub struct Rotation {
    locations: Vec<ImageLocation>,
    /// Index of the location returned by the next call to `next_location`
    position: usize,
}

impl Rotation {
    /// Creates a rotation, or `None` if there is nothing to rotate through
    pub fn new(locations: Vec<ImageLocation>) -> Option<Self> {
        if locations.is_empty() {
            return None;
        }
        Some(Self {
            locations,
            position: 0,
        })
    }

    /// Number of distinct slots in the rotation
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Always false; empty rotations cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Returns the current location and advances, wrapping at the end
    pub fn next_location(&mut self) -> &ImageLocation {
        let index = self.position;
        self.position = (self.position + 1) % self.locations.len();
        &self.locations[index]
    }
}

/// Writes one location per `period` to `out` until `shutdown` completes
///
/// The first location is written immediately.
///
/// # Returns
/// * `Ok(count)` - How many locations were written
/// * `Err` - If writing to `out` fails
pub async fn run_rotation<W, F>(
    mut rotation: Rotation,
    period: Duration,
    out: &mut W,
    shutdown: F,
) -> io::Result<usize>
where
    W: Write,
    F: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(period);
    tokio::pin!(shutdown);
    let mut shown = 0;

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                debug!(shown, "Rotation stopped");
                break;
            }
            _ = interval.tick() => {
                let location = rotation.next_location();
                writeln!(out, "{}", location)?;
                out.flush()?;
                shown += 1;
            }
        }
    }

    Ok(shown)
}

/// Completes on Ctrl-C, or at once if the handler cannot be installed
pub async fn ctrl_c_shutdown() {
    signal_received(tokio::signal::ctrl_c().await);
}

/// Reports whether the signal arrived, logging a failed registration
fn signal_received(result: io::Result<()>) -> bool {
    match result {
        Ok(()) => {
            debug!("Received Ctrl-C");
            true
        }
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl-C; stopping rotation");
            false
        }
    }
}
