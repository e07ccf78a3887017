use crate::foundation::core::Point;

/// Clamp `v` into `[0, 1]`. NaN maps to 0.
pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Inverse of [`lerp`]: position of `v` within `[a, b]`, clamped to `[0, 1]`.
///
/// An empty interval (`a == b`) yields 1 when `v >= a`, else 0.
pub fn inv_lerp(a: f64, b: f64, v: f64) -> f64 {
    let span = b - a;
    if span.abs() <= f64::EPSILON {
        return if v >= a { 1.0 } else { 0.0 };
    }
    clamp01((v - a) / span)
}

/// Map `v` from `[in_a, in_b]` to `[out_a, out_b]`, clamped to the output range.
pub fn map_range(v: f64, in_a: f64, in_b: f64, out_a: f64, out_b: f64) -> f64 {
    lerp(out_a, out_b, inv_lerp(in_a, in_b, v))
}

/// Hermite smoothstep over `[edge0, edge1]`.
pub fn smoothstep(edge0: f64, edge1: f64, v: f64) -> f64 {
    let t = inv_lerp(edge0, edge1, v);
    t * t * (3.0 - 2.0 * t)
}

/// Component-wise point interpolation.
pub fn lerp_point(a: Point, b: Point, t: f64) -> Point {
    Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
