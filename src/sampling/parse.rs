use std::sync::Arc;

use usvg::tiny_skia_path::PathSegment;

use crate::foundation::core::{BezPath, Point, Rect};
use crate::foundation::error::{DotmorphError, DotmorphResult};

/// Parsed SVG artwork ready for sampling.
///
/// `paths` and `view_box` share one user space: the tree's size, with the `viewBox` mapping and
/// every element transform already applied. The parsed tree is kept alive for fill rasterization;
/// dropping the last handle releases it.
#[derive(Clone, Debug)]
pub struct ParsedSvg {
    /// Every path in the document, in absolute user coordinates.
    pub paths: Vec<BezPath>,
    /// Coordinate frame of `paths`.
    pub view_box: Rect,
    /// The parsed document.
    pub tree: Arc<usvg::Tree>,
}

impl ParsedSvg {
    /// Return `true` when the document has no path geometry to sample.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Parse SVG bytes into sampling geometry.
///
/// Size resolution follows `usvg`: explicit `width`/`height`, else the `viewBox` size, else
/// 100x100. Shapes (`rect`, `circle`, ...) and text outlines are converted to paths.
pub fn parse_svg(bytes: &[u8]) -> DotmorphResult<ParsedSvg> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| DotmorphError::svg(format!("parse svg tree: {e}")))?;

    let size = tree.size();
    let view_box = Rect::new(0.0, 0.0, f64::from(size.width()), f64::from(size.height()));

    let mut paths = Vec::new();
    collect_paths(tree.root(), &mut paths);

    Ok(ParsedSvg {
        paths,
        view_box,
        tree: Arc::new(tree),
    })
}

fn collect_paths(group: &usvg::Group, out: &mut Vec<BezPath>) {
    for node in group.children() {
        match node {
            usvg::Node::Group(g) => collect_paths(g, out),
            usvg::Node::Path(p) => {
                let bp = to_bezpath(p.data(), p.abs_transform());
                if !bp.elements().is_empty() {
                    out.push(bp);
                }
            }
            usvg::Node::Text(t) => collect_paths(t.flattened(), out),
            _ => {}
        }
    }
}

fn to_bezpath(data: &usvg::tiny_skia_path::Path, ts: usvg::Transform) -> BezPath {
    let map = |p: usvg::tiny_skia_path::Point| -> Point {
        let (x, y) = (f64::from(p.x), f64::from(p.y));
        Point::new(
            f64::from(ts.sx) * x + f64::from(ts.kx) * y + f64::from(ts.tx),
            f64::from(ts.ky) * x + f64::from(ts.sy) * y + f64::from(ts.ty),
        )
    };

    let mut out = BezPath::new();
    for seg in data.segments() {
        match seg {
            PathSegment::MoveTo(p) => out.move_to(map(p)),
            PathSegment::LineTo(p) => out.line_to(map(p)),
            PathSegment::QuadTo(p1, p2) => out.quad_to(map(p1), map(p2)),
            PathSegment::CubicTo(p1, p2, p3) => out.curve_to(map(p1), map(p2), map(p3)),
            PathSegment::Close => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/sampling/parse.rs"]
mod tests;
