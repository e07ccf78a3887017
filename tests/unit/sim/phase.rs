use super::*;

#[test]
fn phases_advance_on_exact_guards() {
    let mut m = PhaseMachine::new(100.0, 50.0);
    assert_eq!(m.phase(), Phase::InitialConvergence);
    assert_eq!(m.advance(99.0), None);
    assert!((m.progress() - 0.99).abs() < 1e-12);

    assert_eq!(m.advance(1.0), Some(Phase::Transition));
    assert_eq!(m.in_phase_ms(), 0.0);

    assert_eq!(m.advance(49.5), None);
    assert_eq!(m.advance(0.5), Some(Phase::Idle));
    assert_eq!(m.progress(), 1.0);
    assert_eq!(m.advance(10_000.0), None);
}

#[test]
fn large_step_carries_through_several_phases() {
    let mut m = PhaseMachine::new(100.0, 50.0);
    assert_eq!(m.advance(120.0), Some(Phase::Transition));
    assert!((m.in_phase_ms() - 20.0).abs() < 1e-12);

    let mut n = PhaseMachine::new(100.0, 50.0);
    assert_eq!(n.advance(500.0), Some(Phase::Idle));
}

#[test]
fn zero_durations_fall_through() {
    let mut m = PhaseMachine::new(0.0, 0.0);
    assert_eq!(m.progress(), 1.0);
    assert_eq!(m.advance(0.0), Some(Phase::Idle));
}

#[test]
fn skip_to_idle_is_terminal() {
    let mut m = PhaseMachine::new(100.0, 100.0);
    m.skip_to_idle();
    assert_eq!(m.phase(), Phase::Idle);
    assert_eq!(m.advance(1.0), None);
}
