use crate::foundation::core::Point;
use crate::foundation::error::{DotmorphError, DotmorphResult};
use crate::foundation::rng::SeededRng;
use crate::sampling::parse::ParsedSvg;

/// Raster width used for interior sampling; height follows the view-box aspect ratio.
pub const FILL_RASTER_WIDTH: u32 = 800;
/// Pixels with alpha strictly above this count as interior.
pub const FILL_ALPHA_THRESHOLD: u8 = 128;

const MAX_RASTER_DIM: u32 = 16_384;

/// Sample up to `count` interior points by rasterizing the document and picking opaque pixels.
///
/// Returns fewer than `count` points when the artwork covers fewer pixels; callers top up.
pub fn sample_fill(svg: &ParsedSvg, count: usize, rng: &mut SeededRng) -> DotmorphResult<Vec<Point>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let vb = svg.view_box;
    if !(vb.width() > 0.0 && vb.height() > 0.0) {
        return Err(DotmorphError::sampling("degenerate view box"));
    }

    let (w, h) = raster_size(vb.width(), vb.height())?;
    let alpha = rasterize_alpha(&svg.tree, w, h)?;

    let mut candidates: Vec<u32> = alpha
        .iter()
        .enumerate()
        .filter(|&(_, &a)| a > FILL_ALPHA_THRESHOLD)
        .map(|(i, _)| i as u32)
        .collect();
    shuffle(&mut candidates, rng);
    candidates.truncate(count);

    let sx = vb.width() / f64::from(w);
    let sy = vb.height() / f64::from(h);
    Ok(candidates
        .into_iter()
        .map(|i| {
            let px = f64::from(i % w) + 0.5;
            let py = f64::from(i / w) + 0.5;
            Point::new(vb.x0 + px * sx, vb.y0 + py * sy)
        })
        .collect())
}

/// Raster dimensions for a view box of the given size.
pub fn raster_size(vb_w: f64, vb_h: f64) -> DotmorphResult<(u32, u32)> {
    let w = FILL_RASTER_WIDTH;
    let h = (f64::from(w) * vb_h / vb_w).round().max(1.0);
    if !h.is_finite() || h > f64::from(MAX_RASTER_DIM) {
        return Err(DotmorphError::sampling(format!(
            "fill raster height {h} out of range (max {MAX_RASTER_DIM})"
        )));
    }
    Ok((w, h as u32))
}

/// Fisher-Yates shuffle driven by `rng`.
pub fn shuffle<T>(items: &mut [T], rng: &mut SeededRng) {
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1);
        items.swap(i, j);
    }
}

fn rasterize_alpha(tree: &usvg::Tree, width: u32, height: u32) -> DotmorphResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| DotmorphError::sampling("failed to allocate fill pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().chunks_exact(4).map(|px| px[3]).collect())
}

#[cfg(test)]
#[path = "../../tests/unit/sampling/fill.rs"]
mod tests;
