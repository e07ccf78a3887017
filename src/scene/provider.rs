use std::f64::consts::TAU;

use crate::foundation::core::{Point, Rect};
use crate::foundation::rng::SeededRng;

fn default_outline_ratio() -> f64 {
    0.6
}

/// Source of a scene's target point set.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetProvider {
    /// Points sampled from SVG artwork and fitted into the scene placement.
    Svg {
        /// Locator resolved by the session's SVG source.
        url: String,
        /// Fraction of points taken from outlines; the rest fill the interior.
        #[serde(default = "default_outline_ratio")]
        outline_ratio: f64,
        /// Inner padding of the placement rectangle.
        #[serde(default)]
        padding: f64,
    },
    /// Uniform scatter across the placement rectangle.
    Scatter,
    /// A ring pushed out past the placement edges, so dots appear to drift away.
    Dissipate,
}

/// Discriminant of [`TargetProvider`], reported in blends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// SVG-derived.
    Svg,
    /// Procedural scatter.
    Scatter,
    /// Procedural dissipate.
    Dissipate,
}

impl TargetProvider {
    /// SVG provider with default ratio and no padding.
    pub fn svg(url: impl Into<String>) -> Self {
        Self::Svg {
            url: url.into(),
            outline_ratio: default_outline_ratio(),
            padding: 0.0,
        }
    }

    /// Discriminant.
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Svg { .. } => ProviderKind::Svg,
            Self::Scatter => ProviderKind::Scatter,
            Self::Dissipate => ProviderKind::Dissipate,
        }
    }

    /// Generate procedural points synchronously. `None` for SVG providers, which load
    /// off-frame.
    pub fn procedural_points(&self, dest: Rect, count: usize, key: &str) -> Option<Vec<Point>> {
        match self {
            Self::Svg { .. } => None,
            Self::Scatter => Some(scatter_points(dest, count, key)),
            Self::Dissipate => Some(dissipate_points(dest, count, key)),
        }
    }
}

/// Uniformly scattered points inside `dest`, deterministic in `key`.
pub fn scatter_points(dest: Rect, count: usize, key: &str) -> Vec<Point> {
    let mut rng = SeededRng::from_key(&format!("scatter|{key}"));
    (0..count)
        .map(|_| {
            Point::new(
                rng.range(dest.x0, dest.x1),
                rng.range(dest.y0, dest.y1),
            )
        })
        .collect()
}

/// Points on a loose ring around the center of `dest`, mostly beyond its edges.
///
/// Radii fall between 0.8 and 1.25 of the half-diagonal, so most dots leave the visible area
/// while staying close enough to return smoothly.
pub fn dissipate_points(dest: Rect, count: usize, key: &str) -> Vec<Point> {
    let mut rng = SeededRng::from_key(&format!("dissipate|{key}"));
    let center = dest.center();
    let half_diag = 0.5 * dest.width().hypot(dest.height());
    (0..count)
        .map(|_| {
            let angle = rng.range(0.0, TAU);
            let r = half_diag * rng.range(0.8, 1.25);
            Point::new(center.x + r * angle.cos(), center.y + r * angle.sin())
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/scene/provider.rs"]
mod tests;
