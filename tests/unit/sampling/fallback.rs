use super::*;

#[test]
fn spiral_has_exact_count_inside_disc() {
    let dest = Rect::new(0.0, 0.0, 200.0, 100.0);
    let pts = spiral_fallback(321, dest, "missing.svg");
    assert_eq!(pts.len(), 321);
    for p in &pts {
        assert!(p.distance(dest.center()) <= 45.0 + 1e-9);
    }
}

#[test]
fn spiral_is_keyed() {
    let dest = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert_eq!(spiral_fallback(10, dest, "a"), spiral_fallback(10, dest, "a"));
    assert_ne!(spiral_fallback(10, dest, "a"), spiral_fallback(10, dest, "b"));
    assert!(spiral_fallback(0, dest, "a").is_empty());
}
