//! The session: configuration, off-frame target loading and the per-frame control flow.

/// Engine and scenario configuration.
pub mod config;
/// Off-frame SVG target loading.
pub mod loader;
/// The morph session itself.
pub mod morph;

pub use config::{EngineConfig, Scenario};
pub use loader::TargetLoader;
pub use morph::MorphSession;
