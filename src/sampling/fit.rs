use crate::foundation::core::{Point, Rect, Vec2};

/// Uniform scale + translation mapping a view box into a destination rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitTransform {
    /// Scale applied to both axes.
    pub scale: f64,
    /// Translation applied after scaling.
    pub offset: Vec2,
}

impl FitTransform {
    /// Map one point.
    pub fn apply(self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.offset.x, p.y * self.scale + self.offset.y)
    }

    /// Map a rectangle (the scale is positive, so corners stay ordered).
    pub fn apply_rect(self, r: Rect) -> Rect {
        Rect::from_points(self.apply(r.origin()), self.apply(Point::new(r.x1, r.y1)))
    }
}

/// Compute the aspect-preserving fit of `view_box` into `dest` shrunk by `padding` on every side.
///
/// Returns `None` for a degenerate view box or a destination with no room left after padding.
pub fn fit_transform(view_box: Rect, dest: Rect, padding: f64) -> Option<FitTransform> {
    let vb_w = view_box.width();
    let vb_h = view_box.height();
    let avail_w = dest.width() - 2.0 * padding;
    let avail_h = dest.height() - 2.0 * padding;
    let ok = |v: f64| v.is_finite() && v > 0.0;
    if !(ok(vb_w) && ok(vb_h) && ok(avail_w) && ok(avail_h)) {
        return None;
    }

    let scale = (avail_w / vb_w).min(avail_h / vb_h);
    let offset = Vec2::new(
        dest.x0 + padding + (avail_w - vb_w * scale) * 0.5 - view_box.x0 * scale,
        dest.y0 + padding + (avail_h - vb_h * scale) * 0.5 - view_box.y0 * scale,
    );
    Some(FitTransform { scale, offset })
}

/// Fit `points` (in `view_box` space) into `dest`, preserving aspect ratio and centering.
///
/// A degenerate view box or destination leaves the points untouched.
pub fn fit_to_rect(points: &[Point], view_box: Rect, dest: Rect, padding: f64) -> Vec<Point> {
    match fit_transform(view_box, dest, padding) {
        Some(fit) => points.iter().map(|&p| fit.apply(p)).collect(),
        None => {
            tracing::warn!(?view_box, ?dest, padding, "degenerate fit, points left in view-box space");
            points.to_vec()
        }
    }
}

/// Bounding box of a point set, or `None` when empty.
pub fn bounds(points: &[Point]) -> Option<Rect> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold(Rect::from_points(first, first), |r, &p| r.union_pt(p)),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/sampling/fit.rs"]
mod tests;
