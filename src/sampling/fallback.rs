use std::f64::consts::TAU;

use crate::foundation::core::{Point, Rect, Vec2};
use crate::foundation::rng::SeededRng;

const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Deterministic golden-angle spiral filling the largest centered disc of `dest`.
///
/// Substituted for SVG targets that fail to fetch, parse or sample, so the dot field always has
/// a shape to flow toward.
pub fn spiral_fallback(count: usize, dest: Rect, key: &str) -> Vec<Point> {
    let mut rng = SeededRng::from_key(key);
    let phase = rng.range(0.0, TAU);
    let center = dest.center();
    let r_max = 0.45 * dest.width().min(dest.height()).max(0.0);

    (0..count)
        .map(|i| {
            let f = (i as f64 + 0.5) / count as f64;
            let r = r_max * f.sqrt();
            let a = phase + i as f64 * GOLDEN_ANGLE;
            center + Vec2::new(r * a.cos(), r * a.sin())
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/sampling/fallback.rs"]
mod tests;
