//! Per-frame scroll and viewport sampling shared by every mounted scene.

/// Trailing-edge event throttling.
pub mod throttle;
/// The shared frame ticker.
pub mod ticker;

pub use throttle::Throttle;
pub use ticker::{
    FrameRequestId, FrameScheduler, ManualScheduler, StaticViewport, Subscription,
    ViewportProvider, ViewportSample, ViewportTicker,
};
