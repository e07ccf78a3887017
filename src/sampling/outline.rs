use kurbo::{ParamCurve, ParamCurveArclen, PathSeg};

use crate::foundation::core::{BezPath, Point};
use crate::foundation::rng::SeededRng;

/// Length excluded at both ends of a path, in user units.
pub const OUTLINE_EDGE_MARGIN: f64 = 0.5;
/// Jitter span as a fraction of one stratification segment.
pub const OUTLINE_JITTER: f64 = 0.8;

const ARCLEN_ACCURACY: f64 = 1e-4;

/// A path with cached per-segment arc lengths, addressable by distance along it.
#[derive(Clone, Debug)]
pub struct MeasuredPath {
    segs: Vec<PathSeg>,
    // cumulative[i] = length from the path start to the end of segs[i]
    cumulative: Vec<f64>,
}

impl MeasuredPath {
    /// Measure every segment of `path`.
    pub fn new(path: &BezPath) -> Self {
        let segs: Vec<PathSeg> = path.segments().collect();
        let mut cumulative = Vec::with_capacity(segs.len());
        let mut acc = 0.0;
        for seg in &segs {
            acc += seg.arclen(ARCLEN_ACCURACY);
            cumulative.push(acc);
        }
        Self { segs, cumulative }
    }

    /// Total arc length.
    pub fn len(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Return `true` when the path has no measurable length.
    pub fn is_empty(&self) -> bool {
        let len = self.len();
        len.is_nan() || len <= 0.0
    }

    /// Point at distance `d` from the start, clamped to the path.
    pub fn point_at(&self, d: f64) -> Point {
        let Some(last) = self.segs.last() else {
            return Point::ZERO;
        };
        let d = d.clamp(0.0, self.len());
        let idx = self
            .cumulative
            .partition_point(|&c| c < d)
            .min(self.segs.len() - 1);
        let seg = self.segs.get(idx).unwrap_or(last);
        let start = if idx == 0 { 0.0 } else { self.cumulative[idx - 1] };
        let seg_len = self.cumulative[idx] - start;
        let t = if seg_len > 0.0 {
            seg.inv_arclen(d - start, ARCLEN_ACCURACY)
        } else {
            0.0
        };
        seg.eval(t.clamp(0.0, 1.0))
    }
}

/// Sample `count` points along the outlines of `paths`.
///
/// Points are allocated to paths in proportion to arc length (floor, then the remainder
/// round-robin from the first path). Within a path the usable length is split into equal
/// segments with one jittered sample each. A path no longer than its two edge margins yields a
/// single midpoint, so the result can be shorter than `count`. Zero-length paths are ignored.
pub fn sample_outline(paths: &[BezPath], count: usize, rng: &mut SeededRng) -> Vec<Point> {
    if count == 0 {
        return Vec::new();
    }
    let measured: Vec<MeasuredPath> = paths
        .iter()
        .map(MeasuredPath::new)
        .filter(|m| !m.is_empty())
        .collect();
    if measured.is_empty() {
        return Vec::new();
    }

    let counts = allocate_by_length(&measured, count);
    let mut out = Vec::with_capacity(count);
    for (m, &k) in measured.iter().zip(&counts) {
        sample_path(m, k, rng, &mut out);
    }
    out
}

pub(crate) fn allocate_by_length(measured: &[MeasuredPath], count: usize) -> Vec<usize> {
    let total: f64 = measured.iter().map(MeasuredPath::len).sum();
    let mut counts: Vec<usize> = measured
        .iter()
        .map(|m| ((count as f64) * m.len() / total).floor() as usize)
        .collect();

    let mut allocated: usize = counts.iter().sum();
    // Float rounding can overshoot by one on pathological inputs.
    while allocated > count {
        if let Some(c) = counts.iter_mut().rev().find(|c| **c > 0) {
            *c -= 1;
        }
        allocated -= 1;
    }
    let n = counts.len();
    for k in 0..(count - allocated) {
        counts[k % n] += 1;
    }
    counts
}

fn sample_path(m: &MeasuredPath, k: usize, rng: &mut SeededRng, out: &mut Vec<Point>) {
    if k == 0 {
        return;
    }
    let len = m.len();
    if len <= 2.0 * OUTLINE_EDGE_MARGIN {
        out.push(m.point_at(len * 0.5));
        return;
    }

    let usable = len - 2.0 * OUTLINE_EDGE_MARGIN;
    let step = usable / k as f64;
    for j in 0..k {
        let center = OUTLINE_EDGE_MARGIN + (j as f64 + 0.5) * step;
        let jitter = (rng.next_f64() - 0.5) * OUTLINE_JITTER * step;
        out.push(m.point_at(center + jitter));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sampling/outline.rs"]
mod tests;
