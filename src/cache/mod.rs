//! Memoization of SVG parsing and point sampling.

/// SVG byte sources.
pub mod source;
/// The two-level sample cache.
pub mod store;

pub use source::{FsSvgSource, MemorySvgSource, SvgSource, normalize_asset_path};
pub use store::{CacheOpts, CacheStats, FitRequest, SampleCache};
