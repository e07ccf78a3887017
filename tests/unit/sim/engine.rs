use super::*;
use crate::sim::burst::MAX_SPEED_MULT;

fn canvas() -> Canvas {
    Canvas::new(800, 600).unwrap()
}

fn small_config(count: usize) -> SimConfig {
    SimConfig {
        count,
        convergence_ms: 100.0,
        transition_ms: 100.0,
        ..SimConfig::default()
    }
}

fn ring(count: usize, cx: f64, cy: f64, r: f64) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let a = i as f64 / count as f64 * std::f64::consts::TAU;
            Point::new(cx + r * a.cos(), cy + r * a.sin())
        })
        .collect()
}

fn run_to_idle(sim: &mut Simulation) {
    while sim.phase() != Phase::Idle {
        sim.step(1.0 / 60.0);
    }
}

#[test]
fn convergence_is_a_scripted_ease_with_zero_velocity() {
    let homes = ring(40, 400.0, 300.0, 100.0);
    let mut sim = Simulation::new(canvas(), small_config(40), &homes);
    assert_eq!(sim.len(), 40);
    for _ in 0..5 {
        sim.step(0.01);
    }
    assert_eq!(sim.phase(), Phase::InitialConvergence);
    let e = Ease::OutCubic.apply(0.5);
    for d in sim.dots() {
        let expect = lerp_point(d.start_pos, d.home, e);
        assert!((d.pos - expect).hypot() < 1e-9);
        assert_eq!(d.vel, Vec2::ZERO);
    }
}

#[test]
fn phases_run_in_order() {
    let mut sim = Simulation::new(canvas(), small_config(10), &[]);
    let mut seen = vec![sim.phase()];
    for _ in 0..30 {
        sim.step(0.01);
        if seen.last() != Some(&sim.phase()) {
            seen.push(sim.phase());
        }
    }
    assert_eq!(
        seen,
        vec![Phase::InitialConvergence, Phase::Transition, Phase::Idle]
    );
}

#[test]
fn idle_dots_settle_near_home() {
    let homes = ring(100, 400.0, 300.0, 150.0);
    let mut sim = Simulation::new(canvas(), small_config(100), &homes);
    for _ in 0..(60 * 4) {
        sim.step(1.0 / 60.0);
    }
    let mean = sim.dots().iter().map(Dot::home_distance).sum::<f64>() / 100.0;
    assert!(mean < 8.0, "mean distance {mean}");
}

#[test]
fn velocity_stays_clamped_through_repeated_retargets() {
    let left = ring(200, 100.0, 300.0, 60.0);
    let right = ring(200, 700.0, 300.0, 60.0);
    let mut sim = Simulation::new(canvas(), small_config(200), &left);
    run_to_idle(&mut sim);

    let opts = RetargetOptions {
        burst_ms: 800.0,
        stiffness_mult: 50.0,
        damping_mult: 0.1,
        max_speed_mult: 50.0,
    };
    let ceiling = sim.config().max_speed * MAX_SPEED_MULT + 1e-6;
    for round in 0..30 {
        let target = if round % 2 == 0 { &right } else { &left };
        sim.retarget(target, RetargetMode::Snap, opts);
        for _ in 0..6 {
            sim.step(1.0 / 60.0);
            let limit = sim.max_speed() + 1e-6;
            for d in sim.dots() {
                let speed = d.vel.hypot();
                assert!(speed <= limit, "speed {speed} > {limit}");
                assert!(speed <= ceiling);
            }
        }
    }
}

#[test]
fn set_homes_eases_instead_of_jumping() {
    let start = ring(20, 400.0, 300.0, 50.0);
    let target = ring(20, 400.0, 300.0, 250.0);
    let mut sim = Simulation::new(canvas(), small_config(20), &start);
    sim.set_homes(&target);
    sim.step(1.0 / 60.0);
    let d0 = (sim.dots()[0].home - target[0]).hypot();
    assert!(d0 > 150.0 && d0 < 200.0, "{d0}");
    for _ in 0..200 {
        sim.step(1.0 / 60.0);
    }
    assert!((sim.dots()[0].home - target[0]).hypot() < 1.0);
}

#[test]
fn empty_home_sets_are_ignored() {
    let start = ring(8, 10.0, 10.0, 5.0);
    let mut sim = Simulation::new(canvas(), small_config(8), &start);
    sim.set_homes(&[]);
    sim.place_homes(&[]);
    sim.step(0.016);
    assert_eq!(sim.dots()[3].home, start[3]);
}

#[test]
fn lock_in_and_sway_ramps_restart_on_activation() {
    let mut sim = Simulation::new(canvas(), small_config(4), &[]);
    run_to_idle(&mut sim);
    sim.apply_tuning(SceneTuning {
        lock_in_ms: 1000.0,
        sway_ramp_ms: 500.0,
        ..SceneTuning::default()
    });
    assert!((sim.multipliers().stiffness - LOCK_IN_BOOST).abs() < 1e-12);
    assert_eq!(sim.sway_ramp(), 0.0);
    for _ in 0..60 {
        sim.step(1.0 / 60.0);
    }
    assert!((sim.multipliers().stiffness - 1.0).abs() < 1e-9);
    assert!((sim.sway_ramp() - 1.0).abs() < 1e-12);
}

#[test]
fn sway_is_silent_while_converging() {
    let sim = Simulation::new(canvas(), small_config(4), &[]);
    assert_eq!(sim.sway_ramp(), 0.0);
    assert_eq!(sim.sway_offset(&sim.dots()[0]), Vec2::ZERO);
}

#[test]
fn resize_rescales_or_reinitializes() {
    let homes = ring(30, 400.0, 300.0, 100.0);
    let mut sim = Simulation::new(canvas(), small_config(30), &homes);
    sim.resize(Canvas::new(400, 300).unwrap(), 30);
    assert_eq!(sim.len(), 30);
    assert!((sim.dots()[0].home - Point::new(250.0, 150.0)).hypot() < 1e-9);

    sim.resize(Canvas::new(400, 300).unwrap(), 12);
    assert_eq!(sim.len(), 12);
    assert_eq!(sim.phase(), Phase::InitialConvergence);
    assert_eq!(sim.canvas().width, 400);
}

#[test]
fn identical_inputs_are_deterministic() {
    let homes = ring(50, 400.0, 300.0, 120.0);
    let mut a = Simulation::new(canvas(), small_config(50), &homes);
    let mut b = Simulation::new(canvas(), small_config(50), &homes);
    for _ in 0..90 {
        a.step(1.0 / 60.0);
        b.step(1.0 / 60.0);
    }
    assert_eq!(a.dots(), b.dots());
}

#[test]
fn settle_to_homes_zeroes_motion() {
    let homes = ring(10, 400.0, 300.0, 120.0);
    let mut sim = Simulation::new(canvas(), small_config(10), &homes);
    sim.settle_to_homes();
    for (d, h) in sim.dots().iter().zip(&homes) {
        assert_eq!(d.pos, *h);
        assert_eq!(d.vel, Vec2::ZERO);
    }
}
