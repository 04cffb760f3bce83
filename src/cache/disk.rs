use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Application name used for the XDG cache directory
const APP_NAME: &str = "fxconvert";

#[derive(Serialize, Deserialize)]
struct Entry<T> {
    expires_at: DateTime<Utc>,
    value: T,
}

/// A value loaded from disk, flagged once it outlived its time-to-live
#[derive(Debug, PartialEq)]
pub struct Cached<T> {
    pub value: T,
    pub stale: bool,
}

/// JSON files keyed by name in a single directory
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// Cache in the XDG cache directory (`~/.cache/fxconvert/` on Linux)
    ///
    /// Returns `None` if no home directory can be determined.
    pub fn new() -> Option<Self> {
        Self::default_dir().map(Self::with_dir)
    }

    /// The platform cache directory for fxconvert, if one exists
    pub fn default_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.cache_dir().to_path_buf())
    }

    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Stores `value` under `key`, fresh for `ttl`
    pub fn store<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let entry = Entry {
            expires_at: Utc::now() + ttl,
            value,
        };
        let json = serde_json::to_string(&entry).map_err(io::Error::other)?;
        fs::write(self.path(key), json)
    }

    /// Loads the value under `key`; missing or unreadable entries are `None`
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<Cached<T>> {
        let content = fs::read_to_string(self.path(key)).ok()?;
        let entry: Entry<T> = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(key, error = %e, "ignoring unreadable cache entry");
                return None;
            }
        };
        Some(Cached {
            stale: Utc::now() >= entry.expires_at,
            value: entry.value,
        })
    }
}
