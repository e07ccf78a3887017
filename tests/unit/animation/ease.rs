use super::*;

const ALL: [Ease; 7] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}

#[test]
fn out_of_range_progress_is_clamped() {
    for ease in ALL {
        assert_eq!(ease.apply(-1.0), 0.0);
        assert_eq!(ease.apply(2.0), 1.0);
    }
}

#[test]
fn lerp_uses_curve() {
    assert_eq!(Ease::Linear.lerp(10.0, 20.0, 0.5), 15.0);
    assert_eq!(Ease::InQuad.lerp(0.0, 100.0, 0.5), 25.0);
}
