use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::foundation::error::{DotmorphError, DotmorphResult};

/// Where SVG bytes come from. Implementations must be usable from worker threads.
pub trait SvgSource: Send + Sync {
    /// Fetch the raw markup for `url`.
    fn fetch(&self, url: &str) -> DotmorphResult<Vec<u8>>;
}

/// Normalize an asset locator into a relative `/`-separated path.
///
/// A leading `/` is treated as root-relative and stripped. `.` segments are dropped; `..` is
/// rejected so a locator can never escape the asset root.
pub fn normalize_asset_path(url: &str) -> DotmorphResult<String> {
    let s = url.trim().replace('\\', "/");
    let s = s.trim_start_matches('/');
    if s.is_empty() {
        return Err(DotmorphError::validation("asset locator must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(DotmorphError::validation(
                "asset locators must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(DotmorphError::validation(
            "asset locator must contain a file name",
        ));
    }
    Ok(out.join("/"))
}

/// Reads SVG files relative to a root directory.
#[derive(Clone, Debug)]
pub struct FsSvgSource {
    root: PathBuf,
}

impl FsSvgSource {
    /// Serve files under `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl SvgSource for FsSvgSource {
    fn fetch(&self, url: &str) -> DotmorphResult<Vec<u8>> {
        let norm = normalize_asset_path(url)?;
        let p = self.root.join(Path::new(&norm));
        std::fs::read(&p)
            .map_err(|e| DotmorphError::fetch(format!("failed to read '{}': {e}", p.display())))
    }
}

/// In-memory source keyed by locator. Counts fetches so callers can observe deduplication.
#[derive(Debug, Default)]
pub struct MemorySvgSource {
    entries: RwLock<HashMap<String, Arc<[u8]>>>,
    fetches: AtomicU64,
}

impl MemorySvgSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(self, url: impl Into<String>, markup: impl AsRef<[u8]>) -> Self {
        self.insert(url, markup);
        self
    }

    /// Register or replace markup for `url`.
    pub fn insert(&self, url: impl Into<String>, markup: impl AsRef<[u8]>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), Arc::from(markup.as_ref()));
    }

    /// Number of successful and failed fetches served so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl SvgSource for MemorySvgSource {
    fn fetch(&self, url: &str) -> DotmorphResult<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .map(|b| b.to_vec())
            .ok_or_else(|| DotmorphError::fetch(format!("no svg registered for '{url}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/source.rs"]
mod tests;
