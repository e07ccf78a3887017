//! SVG point sampling: parse, outline + interior sampling, fitting and the procedural fallback.

/// Spiral fallback for unusable artwork.
pub mod fallback;
/// Interior sampling via rasterization.
pub mod fill;
/// View-box to canvas fitting.
pub mod fit;
/// Arc-length stratified outline sampling.
pub mod outline;
/// SVG parsing into path geometry.
pub mod parse;

use crate::foundation::core::Point;
use crate::foundation::math::clamp01;
use crate::foundation::rng::SeededRng;

pub use fallback::spiral_fallback;
pub use fill::sample_fill;
pub use fit::{FitTransform, fit_to_rect, fit_transform};
pub use outline::sample_outline;
pub use parse::{ParsedSvg, parse_svg};

/// Sample `count` points from parsed artwork, in view-box space.
///
/// `outline_ratio` of the points come from the outline, the rest from the interior. A fill
/// shortfall (thin artwork, rasterization failure) is topped up with extra outline samples.
/// The output is shorter than `count` only when every path is degenerate.
pub fn sample_svg(
    svg: &ParsedSvg,
    count: usize,
    outline_ratio: f64,
    rng: &mut SeededRng,
) -> Vec<Point> {
    let outline_n = ((count as f64) * clamp01(outline_ratio)).round() as usize;
    let outline_n = outline_n.min(count);
    let fill_n = count - outline_n;

    let mut outline_rng = rng.fork("outline");
    let mut fill_rng = rng.fork("fill");
    let mut top_up_rng = rng.fork("top-up");

    let mut out = sample_outline(&svg.paths, outline_n, &mut outline_rng);
    let fill = match sample_fill(svg, fill_n, &mut fill_rng) {
        Ok(pts) => pts,
        Err(e) => {
            tracing::warn!(error = %e, "fill sampling failed, using outline only");
            Vec::new()
        }
    };
    let shortfall = fill_n - fill.len();
    out.extend(fill);

    if shortfall > 0 {
        tracing::debug!(shortfall, "topping up fill shortfall with outline samples");
        out.extend(sample_outline(&svg.paths, shortfall, &mut top_up_rng));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/sampling/mod.rs"]
mod tests;
