use super::*;

const OUTLINED: &[u8] = br#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 40 40">
    <path d="M0 0 H40 V40 H0 Z" fill="none" stroke="black" stroke-width="0.01"/>
</svg>"#;

const SOLID: &[u8] = br#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 40 40">
    <path d="M0 0 H40 V40 H0 Z"/>
</svg>"#;

#[test]
fn full_outline_ratio_never_rasterizes_points() {
    let svg = parse_svg(SOLID).unwrap();
    let pts = sample_svg(&svg, 120, 1.0, &mut SeededRng::from_key("all-outline"));
    assert_eq!(pts.len(), 120);
    for p in &pts {
        let on_edge = p.x == 0.0 || p.x == 40.0 || p.y == 0.0 || p.y == 40.0;
        assert!(on_edge, "{p:?}");
    }
}

#[test]
fn mixed_ratio_yields_exact_count() {
    let svg = parse_svg(SOLID).unwrap();
    let pts = sample_svg(&svg, 200, 0.3, &mut SeededRng::from_key("mixed"));
    assert_eq!(pts.len(), 200);
}

#[test]
fn hairline_artwork_is_topped_up_from_outline() {
    let svg = parse_svg(OUTLINED).unwrap();
    let pts = sample_svg(&svg, 500, 0.0, &mut SeededRng::from_key("hairline"));
    assert_eq!(pts.len(), 500);
}

#[test]
fn sample_svg_is_reproducible() {
    let svg = parse_svg(SOLID).unwrap();
    let a = sample_svg(&svg, 80, 0.5, &mut SeededRng::from_key("repro"));
    let b = sample_svg(&svg, 80, 0.5, &mut SeededRng::from_key("repro"));
    assert_eq!(a, b);
}
