//! On-disk cache for the currency list
//!
//! Entries carry an expiry time; stale entries are still readable so a
//! failed fetch can fall back to the last good response.

mod disk;

pub use disk::{Cached, DiskCache};
