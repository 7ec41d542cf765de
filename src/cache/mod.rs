//! Cache module for persisting resolved image locations to disk
//!
//! This module provides a cache store that keeps the most recent successful
//! live result for each tag as a JSON array in the temporary directory. The
//! resolver reads it back when every live source comes up empty.

mod store;

pub use store::{CacheError, CacheStore};
