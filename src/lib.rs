//! dotmorph is a scroll-driven particle morph engine.
//!
//! A field of dots flows between shapes as a host scrolls through a document. Shapes come from
//! SVG artwork (sampled along outlines and across the interior) or from procedural patterns.
//! The public API is session-oriented:
//!
//! - Build a [`MorphSession`] over a canvas with an [`SvgSource`] and a [`ViewportProvider`]
//! - Mount [`SceneConfig`]s tied to scroll ranges
//! - Drive frames with [`MorphSession::on_frame`] and draw them with [`MorphSession::render`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Easing curves.
pub mod animation;
/// Memoized SVG parsing and sampling.
pub mod cache;
/// Geometry, errors, math and seeded randomness.
pub mod foundation;
/// CPU rendering of the dot field.
pub mod render;
/// SVG point sampling.
pub mod sampling;
/// Scenes and scroll resolution.
pub mod scene;
/// Session: configuration, loading and the frame loop.
pub mod session;
/// Particle physics.
pub mod sim;
/// Viewport sampling and frame ticking.
pub mod viewport;

pub use crate::animation::ease::Ease;
pub use crate::cache::{
    CacheOpts, CacheStats, FitRequest, FsSvgSource, MemorySvgSource, SampleCache, SvgSource,
};
pub use crate::foundation::core::{BezPath, Canvas, FrameRGBA, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{DotmorphError, DotmorphResult};
pub use crate::render::{DotRenderer, RenderConfig};
pub use crate::sampling::{ParsedSvg, fit_to_rect, parse_svg, sample_svg, spiral_fallback};
pub use crate::scene::{
    Anchor, ProviderKind, SceneConfig, SceneId, SceneRegistry, SceneTuning, ScrollRange,
    SwayStyle, TargetBlend, TargetProvider,
};
pub use crate::session::{EngineConfig, MorphSession, Scenario, TargetLoader};
pub use crate::sim::{Phase, RetargetMode, RetargetOptions, SimConfig, Simulation};
pub use crate::viewport::{
    FrameScheduler, ManualScheduler, StaticViewport, Subscription, Throttle, ViewportProvider,
    ViewportSample, ViewportTicker,
};
