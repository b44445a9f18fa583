use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Disk-backed response cache keyed by request URL. A populated cache
/// makes repeated runs byte-identical and network-free, which is the only
/// resume mechanism the pipeline has.
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache directory: {:?}", dir))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Returns the cached bytes for `key`, or invokes `populate`, persists
    /// its result atomically (temp file + rename), and returns it. A
    /// populate failure is propagated and nothing is cached.
    pub fn get_or_populate<F>(&self, key: &str, populate: F) -> Result<Vec<u8>>
    where
        F: FnOnce() -> Result<Vec<u8>>,
    {
        let path = self.entry_path(key);
        if let Ok(bytes) = fs::read(&path) {
            debug!(key, "Cache hit");
            return Ok(bytes);
        }

        let bytes = populate()?;
        let tmp_path = self.dir.join(format!("{key}.tmp"));
        fs::write(&tmp_path, &bytes)
            .with_context(|| format!("Failed to write cache entry: {:?}", tmp_path))?;
        fs::rename(&tmp_path, &path)
            .with_context(|| format!("Failed to rename cache entry into place: {:?}", path))?;
        debug!(key, bytes = bytes.len(), "Cache entry written");
        Ok(bytes)
    }
}

/// Strips every `/` and every occurrence of the API key out of a URL so it
/// can be used as a cache filename without leaking the key to disk.
pub fn cache_key(url: &str, api_key: &str) -> String {
    let stripped = url.replace('/', "_");
    if api_key.is_empty() {
        stripped
    } else {
        stripped.replace(api_key, "_")
    }
}
