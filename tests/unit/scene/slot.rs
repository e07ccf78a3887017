use super::*;

fn pts(n: usize) -> Arc<[Point]> {
    (0..n).map(|i| Point::new(i as f64, 0.0)).collect()
}

#[test]
fn stale_requests_are_ignored() {
    let slot = TargetSlot::new();
    let weak = slot.downgrade();
    let first = slot.begin_request();
    let second = slot.begin_request();
    assert!(!weak.publish(first, pts(3), false));
    assert!(slot.points().is_none());
    assert!(slot.is_pending());

    assert!(weak.publish(second, pts(4), true));
    assert_eq!(slot.points().unwrap().len(), 4);
    assert!(slot.is_fallback());
    assert!(!slot.is_pending());
}

#[test]
fn late_result_after_unmount_is_dropped() {
    let slot = TargetSlot::new();
    let weak = slot.downgrade();
    let req = slot.begin_request();
    drop(slot);
    assert!(!weak.is_alive());
    assert!(!weak.publish(req, pts(2), false));
}

#[test]
fn old_points_survive_until_replaced() {
    let slot = TargetSlot::new();
    let r1 = slot.begin_request();
    assert!(slot.publish(r1, pts(2), false));
    assert_eq!(slot.published(), r1);
    let r2 = slot.begin_request();
    assert_eq!(slot.points().unwrap().len(), 2);
    assert_eq!(slot.published(), r1);
    assert!(slot.publish(r2, pts(5), false));
    assert_eq!(slot.published(), r2);
}

#[test]
fn empty_sets_never_publish() {
    let slot = TargetSlot::new();
    let r = slot.begin_request();
    assert!(!slot.publish(r, pts(0), false));
    assert!(slot.points().is_none());
}
