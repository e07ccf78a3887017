use crate::foundation::core::Rgba8;
use crate::foundation::error::{DotmorphError, DotmorphResult};

/// Renderer appearance. All fields default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Canvas clear color.
    pub background: Rgba8,
    /// Color of a dot sitting on its home.
    pub settled_color: Rgba8,
    /// Color of a dot at or beyond the settle radius.
    pub unsettled_color: Rgba8,
    /// Draw every dot statically at its home, bypassing physics.
    pub reduced_motion: bool,
    /// Dots further than this outside the canvas are not drawn.
    pub offscreen_margin_px: f64,
    /// Multiplier on every dot radius.
    pub radius_scale: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Rgba8::new(11, 12, 18, 255),
            settled_color: Rgba8::new(236, 238, 245, 255),
            unsettled_color: Rgba8::new(108, 138, 255, 255),
            reduced_motion: false,
            offscreen_margin_px: 24.0,
            radius_scale: 1.0,
        }
    }
}

impl RenderConfig {
    /// Reject unusable values.
    pub fn validate(&self) -> DotmorphResult<()> {
        if !self.offscreen_margin_px.is_finite() || self.offscreen_margin_px < 0.0 {
            return Err(DotmorphError::config(
                "render.offscreen_margin_px must be finite and >= 0",
            ));
        }
        if !self.radius_scale.is_finite() || self.radius_scale <= 0.0 {
            return Err(DotmorphError::config(
                "render.radius_scale must be finite and > 0",
            ));
        }
        Ok(())
    }
}
