use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::cache::source::SvgSource;
use crate::foundation::core::{Point, Rect, Vec2};
use crate::foundation::error::{DotmorphError, DotmorphResult};
use crate::foundation::rng::SeededRng;
use crate::sampling::{ParsedSvg, fit_to_rect, parse_svg, sample_svg};

const DEFAULT_MAX_SVG_ENTRIES: usize = 12;

/// Sample cache configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CacheOpts {
    /// Maximum parsed SVG documents retained. Clamped to at least 1.
    pub max_svg_entries: usize,
}

impl Default for CacheOpts {
    fn default() -> Self {
        let max_svg_entries = std::env::var("DOTMORPH_SVG_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_SVG_ENTRIES);
        Self { max_svg_entries }
    }
}

/// Parameters identifying one fitted point set.
#[derive(Clone, Debug, PartialEq)]
pub struct FitRequest {
    /// SVG locator, resolved through the cache's [`SvgSource`].
    pub url: String,
    /// Number of points wanted.
    pub count: usize,
    /// Destination rectangle in canvas pixels.
    pub dest: Rect,
    /// Inner padding of `dest`.
    pub padding: f64,
    /// Pixel offset added after fitting.
    pub offset: Vec2,
    /// Fraction of points sampled from the outline (rest from the interior).
    pub outline_ratio: f64,
}

impl FitRequest {
    /// Key the sampling RNG is seeded from. Fit parameters are excluded: they only move points.
    pub fn seed_key(&self) -> String {
        format!("{}|{}|{}", self.url, self.count, self.outline_ratio)
    }

    fn cache_key(&self) -> FittedKey {
        FittedKey {
            url: self.url.clone(),
            count: self.count,
            dest: [
                self.dest.x0.to_bits(),
                self.dest.y0.to_bits(),
                self.dest.x1.to_bits(),
                self.dest.y1.to_bits(),
            ],
            padding: self.padding.to_bits(),
            offset: [self.offset.x.to_bits(), self.offset.y.to_bits()],
            outline_ratio: self.outline_ratio.to_bits(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct FittedKey {
    url: String,
    count: usize,
    dest: [u64; 4],
    padding: u64,
    offset: [u64; 2],
    outline_ratio: u64,
}

/// Failure shared with every waiter on a slot. `DotmorphError` is not `Clone`.
#[derive(Clone, Debug)]
enum Failure {
    Fetch(String),
    Svg(String),
    Sampling(String),
    Other(String),
}

impl Failure {
    fn from_error(e: &DotmorphError) -> Self {
        match e {
            DotmorphError::Fetch(m) => Self::Fetch(m.clone()),
            DotmorphError::Svg(m) => Self::Svg(m.clone()),
            DotmorphError::Sampling(m) => Self::Sampling(m.clone()),
            other => Self::Other(other.to_string()),
        }
    }

    fn to_error(&self) -> DotmorphError {
        match self {
            Self::Fetch(m) => DotmorphError::fetch(m.clone()),
            Self::Svg(m) => DotmorphError::svg(m.clone()),
            Self::Sampling(m) => DotmorphError::sampling(m.clone()),
            Self::Other(m) => DotmorphError::Other(anyhow::anyhow!("{m}")),
        }
    }
}

// A slot is inserted before its work runs; concurrent callers share it and block in
// `OnceLock::get_or_init` until the single computation finishes.
type SvgSlot = Arc<OnceLock<Result<Arc<ParsedSvg>, Failure>>>;
type FittedSlot = Arc<OnceLock<Result<Arc<[Point]>, Failure>>>;

/// Counters exposed for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Fetch + parse operations actually run.
    pub svg_loads: u64,
    /// Parsed-SVG lookups served from an existing slot.
    pub svg_hits: u64,
    /// Sample + fit operations actually run.
    pub fitted_computes: u64,
    /// Fitted lookups served from an existing slot.
    pub fitted_hits: u64,
    /// Parsed documents evicted by the capacity bound.
    pub evictions: u64,
}

#[derive(Default)]
struct CacheState {
    svgs: HashMap<String, SvgSlot>,
    // insertion order, oldest first
    order: VecDeque<String>,
    fitted: HashMap<FittedKey, FittedSlot>,
    stats: CacheStats,
}

impl CacheState {
    fn evict_over(&mut self, capacity: usize) {
        while self.order.len() > capacity {
            let Some(url) = self.order.pop_front() else {
                break;
            };
            self.svgs.remove(&url);
            let before = self.fitted.len();
            self.fitted.retain(|k, _| k.url != url);
            self.stats.evictions += 1;
            tracing::debug!(
                %url,
                purged_fitted = before - self.fitted.len(),
                "evicted parsed svg"
            );
        }
    }
}

/// Two-level memoization of SVG work, owned by one session.
///
/// Level one holds parsed documents keyed by locator, bounded and evicted in insertion order.
/// Level two holds fitted point sets keyed by the full [`FitRequest`]; it is unbounded but each
/// entry is purged together with its parent document.
pub struct SampleCache {
    source: Arc<dyn SvgSource>,
    opts: CacheOpts,
    state: Mutex<CacheState>,
}

impl std::fmt::Debug for SampleCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleCache")
            .field("opts", &self.opts)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl SampleCache {
    /// Create an empty cache reading artwork from `source`.
    pub fn new(source: Arc<dyn SvgSource>, opts: CacheOpts) -> Self {
        Self {
            source,
            opts: CacheOpts {
                max_svg_entries: opts.max_svg_entries.max(1),
            },
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Effective options.
    pub fn opts(&self) -> CacheOpts {
        self.opts
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the parsed document for `url`, fetching and parsing it on first use.
    pub fn get_parsed_svg(&self, url: &str) -> DotmorphResult<Arc<ParsedSvg>> {
        let slot = {
            let mut st = self.lock();
            match st.svgs.get(url) {
                Some(slot) => {
                    let slot = Arc::clone(slot);
                    st.stats.svg_hits += 1;
                    slot
                }
                None => {
                    let slot: SvgSlot = Arc::new(OnceLock::new());
                    st.svgs.insert(url.to_string(), Arc::clone(&slot));
                    st.order.push_back(url.to_string());
                    st.evict_over(self.opts.max_svg_entries);
                    slot
                }
            }
        };

        match slot.get_or_init(|| self.load_svg(url)) {
            Ok(svg) => Ok(Arc::clone(svg)),
            Err(failure) => {
                self.forget_svg(url, &slot);
                Err(failure.to_error())
            }
        }
    }

    /// Return fitted points for `req`, sampling and fitting on first use.
    ///
    /// The result always holds exactly `req.count` points: when degenerate paths yield fewer
    /// samples the set is cycled to length.
    pub fn get_fitted_points(&self, req: &FitRequest) -> DotmorphResult<Arc<[Point]>> {
        let key = req.cache_key();
        let slot = {
            let mut st = self.lock();
            match st.fitted.get(&key) {
                Some(slot) => {
                    let slot = Arc::clone(slot);
                    st.stats.fitted_hits += 1;
                    slot
                }
                None => {
                    let slot: FittedSlot = Arc::new(OnceLock::new());
                    st.fitted.insert(key.clone(), Arc::clone(&slot));
                    slot
                }
            }
        };

        match slot.get_or_init(|| self.compute_fitted(req)) {
            Ok(points) => Ok(Arc::clone(points)),
            Err(failure) => {
                let mut st = self.lock();
                if st.fitted.get(&key).is_some_and(|s| Arc::ptr_eq(s, &slot)) {
                    st.fitted.remove(&key);
                }
                Err(failure.to_error())
            }
        }
    }

    /// Drop every cached document and point set.
    pub fn clear(&self) {
        let mut st = self.lock();
        st.svgs.clear();
        st.order.clear();
        st.fitted.clear();
        tracing::debug!("sample cache cleared");
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    /// Locators currently cached, oldest first.
    pub fn cached_urls(&self) -> Vec<String> {
        self.lock().order.iter().cloned().collect()
    }

    /// Number of fitted point sets currently cached.
    pub fn fitted_len(&self) -> usize {
        self.lock().fitted.len()
    }

    /// Number of fitted point sets cached for `url`.
    pub fn fitted_len_for(&self, url: &str) -> usize {
        self.lock().fitted.keys().filter(|k| k.url == url).count()
    }

    fn load_svg(&self, url: &str) -> Result<Arc<ParsedSvg>, Failure> {
        self.lock().stats.svg_loads += 1;
        let parsed = self
            .source
            .fetch(url)
            .and_then(|bytes| parse_svg(&bytes))
            .map_err(|e| {
                tracing::warn!(%url, error = %e, "svg load failed");
                Failure::from_error(&e)
            })?;
        tracing::debug!(%url, paths = parsed.paths.len(), "parsed svg");
        Ok(Arc::new(parsed))
    }

    fn forget_svg(&self, url: &str, slot: &SvgSlot) {
        let mut st = self.lock();
        if st.svgs.get(url).is_some_and(|s| Arc::ptr_eq(s, slot)) {
            st.svgs.remove(url);
            st.order.retain(|u| u != url);
        }
    }

    fn compute_fitted(&self, req: &FitRequest) -> Result<Arc<[Point]>, Failure> {
        let svg = self
            .get_parsed_svg(&req.url)
            .map_err(|e| Failure::from_error(&e))?;
        self.lock().stats.fitted_computes += 1;

        if svg.is_empty() {
            return Err(Failure::Svg(format!("'{}' has no path geometry", req.url)));
        }

        let mut rng = SeededRng::from_key(&req.seed_key());
        let sampled = sample_svg(&svg, req.count, req.outline_ratio, &mut rng);
        if sampled.is_empty() && req.count > 0 {
            return Err(Failure::Sampling(format!(
                "'{}' produced no samples",
                req.url
            )));
        }

        let fitted = fit_to_rect(&sampled, svg.view_box, req.dest, req.padding);
        let points: Vec<Point> = fitted
            .iter()
            .cycle()
            .take(req.count)
            .map(|&p| p + req.offset)
            .collect();
        Ok(Arc::from(points))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/store.rs"]
mod tests;
