use crate::foundation::core::{Rect, Vec2};
use crate::scene::provider::TargetProvider;

/// Stable identity of a mounted scene.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct SceneId(pub String);

impl SceneId {
    /// Wrap a scene name.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The underlying name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SceneId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SceneId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Half-open document scroll interval `[start, end)` in pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollRange {
    /// First scroll offset inside the range.
    pub start: f64,
    /// First scroll offset past the range.
    pub end: f64,
}

impl ScrollRange {
    /// Build a range. An inverted range collapses to zero length at `start`.
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Infer a range from a mounted element's layout: it spans the element's own height, shifted
    /// by the optional offsets.
    pub fn from_measure(top: f64, height: f64, start_offset: f64, end_offset: f64) -> Self {
        Self::new(top + start_offset, top + height.max(0.0) + end_offset)
    }

    /// `end - start`.
    pub fn len(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Whether the range covers no scroll offsets.
    pub fn is_empty(&self) -> bool {
        self.len() <= 0.0
    }

    /// Whether `y` lies in `[start, end)`.
    pub fn contains(&self, y: f64) -> bool {
        y >= self.start && y < self.end
    }
}

/// Where a scaled target sits inside the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Centered both ways.
    #[default]
    Center,
    /// Top edge, centered horizontally.
    Top,
    /// Bottom edge, centered horizontally.
    Bottom,
    /// Left edge, centered vertically.
    Left,
    /// Right edge, centered vertically.
    Right,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

impl Anchor {
    /// Fractional position of the anchor along each axis (0 = left/top, 1 = right/bottom).
    pub fn factors(self) -> (f64, f64) {
        match self {
            Self::Center => (0.5, 0.5),
            Self::Top => (0.5, 0.0),
            Self::Bottom => (0.5, 1.0),
            Self::Left => (0.0, 0.5),
            Self::Right => (1.0, 0.5),
            Self::TopLeft => (0.0, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::BottomLeft => (0.0, 1.0),
            Self::BottomRight => (1.0, 1.0),
        }
    }
}

/// How the idle sway is expressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwayStyle {
    /// Sway drives the simulation as an extra force; dots are drawn where they are.
    Force,
    /// Sway is a drawn offset around the simulated position.
    #[default]
    TargetOffset,
}

/// Per-scene physics and placement knobs. Every field has a default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SceneTuning {
    /// Spring stiffness multiplier while the scene is active.
    pub stiffness_mult: f64,
    /// Per-frame damping multiplier while the scene is active.
    pub damping_mult: f64,
    /// Speed ceiling multiplier while the scene is active.
    pub max_speed_mult: f64,
    /// Fire a snap burst when the scene becomes active.
    pub snap_on_enter: bool,
    /// Target size relative to the canvas.
    pub target_scale: f64,
    /// Placement of the scaled target.
    pub target_anchor: Anchor,
    /// Pixel offset applied after placement.
    pub target_offset: [f64; 2],
    /// Stiffness boost window after activation.
    pub lock_in_ms: f64,
    /// Time constant for homes easing toward a new blend.
    pub home_snap_ms: f64,
    /// Sway fade-in after activation.
    pub sway_ramp_ms: f64,
    /// Sway expression.
    pub sway_style: SwayStyle,
    /// Distance at which a dot is drawn fully unsettled.
    pub settle_radius_px: f64,
    /// Distance inside which dots creep kinematically onto home.
    pub snap_radius_px: f64,
    /// Creep speed inside `snap_radius_px`.
    pub snap_speed_px_s: f64,
    /// Speeds up home easing.
    pub morph_speed_mult: f64,
}

impl Default for SceneTuning {
    fn default() -> Self {
        Self {
            stiffness_mult: 1.0,
            damping_mult: 1.0,
            max_speed_mult: 1.0,
            snap_on_enter: false,
            target_scale: 1.0,
            target_anchor: Anchor::Center,
            target_offset: [0.0, 0.0],
            lock_in_ms: 0.0,
            home_snap_ms: 450.0,
            sway_ramp_ms: 1200.0,
            sway_style: SwayStyle::TargetOffset,
            settle_radius_px: 24.0,
            snap_radius_px: 1.5,
            snap_speed_px_s: 60.0,
            morph_speed_mult: 1.0,
        }
    }
}

impl SceneTuning {
    /// Rectangle the target is fitted into, before `target_offset`.
    pub fn placement(&self, canvas: Rect) -> Rect {
        let scale = if self.target_scale.is_finite() {
            self.target_scale.max(0.0)
        } else {
            1.0
        };
        let (w, h) = (canvas.width() * scale, canvas.height() * scale);
        let (fx, fy) = self.target_anchor.factors();
        let x0 = canvas.x0 + (canvas.width() - w) * fx;
        let y0 = canvas.y0 + (canvas.height() - h) * fy;
        Rect::new(x0, y0, x0 + w, y0 + h)
    }

    /// `target_offset` as a vector.
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.target_offset[0], self.target_offset[1])
    }

    /// Effective home easing time constant in milliseconds.
    pub fn home_ease_ms(&self) -> f64 {
        let mult = if self.morph_speed_mult > 0.0 {
            self.morph_speed_mult
        } else {
            1.0
        };
        (self.home_snap_ms / mult).max(0.0)
    }
}

/// Everything a host declares when mounting a scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneConfig {
    /// Scene identity; also the seed key for procedural targets.
    pub id: SceneId,
    /// Scroll interval over which the scene is the target.
    pub range: ScrollRange,
    /// Document-order index; higher wins ties.
    #[serde(default)]
    pub order: i64,
    /// Where the target points come from.
    pub provider: TargetProvider,
    /// Physics and placement knobs.
    #[serde(default)]
    pub tuning: SceneTuning,
}

impl SceneConfig {
    /// Config with default tuning.
    pub fn new(
        id: impl Into<SceneId>,
        range: ScrollRange,
        order: i64,
        provider: TargetProvider,
    ) -> Self {
        Self {
            id: id.into(),
            range,
            order,
            provider,
            tuning: SceneTuning::default(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
