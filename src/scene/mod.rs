//! Scroll-mounted scenes and scroll → target resolution.

/// Scene configuration and tuning.
pub mod config;
/// Target point providers.
pub mod provider;
/// Ordered scene registry.
pub mod registry;
/// Asynchronously filled target slots.
pub mod slot;

pub use config::{Anchor, SceneConfig, SceneId, SceneTuning, ScrollRange, SwayStyle};
pub use provider::{ProviderKind, TargetProvider, dissipate_points, scatter_points};
pub use registry::{SceneEntry, SceneRegistry, TargetBlend};
pub use slot::{TargetSlot, WeakTargetSlot};
