use super::*;
use crate::sim::config::SimConfig;

fn field(homes: &[Point]) -> Simulation {
    let canvas = Canvas::new(64, 64).unwrap();
    let cfg = SimConfig {
        count: homes.len(),
        convergence_ms: 0.0,
        transition_ms: 0.0,
        ..SimConfig::default()
    };
    Simulation::new(canvas, cfg, homes)
}

fn big_dots() -> RenderConfig {
    RenderConfig {
        radius_scale: 4.0,
        ..RenderConfig::default()
    }
}

fn close(px: [u8; 4], c: Rgba8) -> bool {
    let d = |a: u8, b: u8| a.abs_diff(b) <= 1;
    d(px[0], c.r) && d(px[1], c.g) && d(px[2], c.b) && d(px[3], c.a)
}

#[test]
fn empty_canvas_is_background() {
    let mut sim = field(&[Point::new(-500.0, -500.0)]);
    sim.settle_to_homes();
    let cfg = RenderConfig::default();
    let mut r = DotRenderer::new(sim.canvas(), cfg.clone()).unwrap();
    let frame = r.render(&sim);
    assert_eq!((frame.width, frame.height), (64, 64));
    assert_eq!(frame.data.len(), 64 * 64 * 4);
    assert!(frame.premultiplied);
    assert!(close(frame.pixel(5, 5).unwrap(), cfg.background));
    assert!(close(frame.pixel(63, 63).unwrap(), cfg.background));
    assert_eq!(r.last_drawn(), 0);
}

#[test]
fn settled_dot_is_drawn_in_settled_color() {
    let mut sim = field(&[Point::new(32.5, 32.5)]);
    sim.settle_to_homes();
    let mut r = DotRenderer::new(sim.canvas(), big_dots()).unwrap();
    let frame = r.render(&sim);
    assert_eq!(r.last_drawn(), 1);
    assert!(close(frame.pixel(32, 32).unwrap(), r.config().settled_color));
    assert!(close(frame.pixel(2, 2).unwrap(), r.config().background));
}

#[test]
fn reduced_motion_draws_at_home() {
    let home = Point::new(20.5, 40.5);
    let sim = field(&[home]);
    assert!(sim.dots()[0].home_distance() > 0.0);
    let mut r = DotRenderer::new(sim.canvas(), big_dots()).unwrap();
    r.set_reduced_motion(true);
    let frame = r.render(&sim);
    assert!(close(frame.pixel(20, 40).unwrap(), r.config().settled_color));
}

#[test]
fn settledness_and_color_interpolate() {
    let sim = field(&[Point::new(10.0, 10.0)]);
    let mut dot = sim.dots()[0].clone();
    dot.pos = dot.home;
    assert_eq!(settledness(&dot, 24.0), 1.0);
    dot.pos = dot.home + Vec2::new(24.0, 0.0);
    assert_eq!(settledness(&dot, 24.0), 0.0);
    dot.pos = dot.home + Vec2::new(100.0, 0.0);
    assert_eq!(settledness(&dot, 24.0), 0.0);
    assert_eq!(settledness(&dot, 0.0), 1.0);

    let cfg = RenderConfig::default();
    assert_eq!(dot_color(&cfg, 1.0), cfg.settled_color);
    assert_eq!(dot_color(&cfg, 0.0), cfg.unsettled_color);
}

#[test]
fn dots_beyond_margin_are_skipped() {
    let mut sim = field(&[
        Point::new(32.0, 32.0),
        Point::new(-10.0, 32.0),
        Point::new(200.0, 32.0),
    ]);
    sim.settle_to_homes();
    let mut r = DotRenderer::new(sim.canvas(), RenderConfig::default()).unwrap();
    r.render(&sim);
    assert_eq!(r.last_drawn(), 2);
}

#[test]
fn resize_changes_frame_dimensions() {
    let sim = field(&[Point::new(1.0, 1.0)]);
    let mut r = DotRenderer::new(sim.canvas(), RenderConfig::default()).unwrap();
    r.resize(Canvas::new(32, 16).unwrap()).unwrap();
    let frame = r.render(&sim);
    assert_eq!((frame.width, frame.height), (32, 16));
    assert_eq!(frame.data.len(), 32 * 16 * 4);
}

#[test]
fn invalid_render_config_is_rejected() {
    let bad = RenderConfig {
        radius_scale: 0.0,
        ..RenderConfig::default()
    };
    assert!(bad.validate().is_err());
    assert!(RenderConfig::default().validate().is_ok());
}
