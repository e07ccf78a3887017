use super::*;
use crate::cache::source::MemorySvgSource;
use crate::cache::store::CacheOpts;
use crate::foundation::core::{Rect, Vec2};
use crate::scene::slot::TargetSlot;

const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="40" viewBox="0 0 40 40"><path d="M0 0 H40 V40 H0 Z"/></svg>"#;

fn cache() -> Arc<SampleCache> {
    let src = MemorySvgSource::new().with("square.svg", SQUARE);
    Arc::new(SampleCache::new(Arc::new(src), CacheOpts { max_svg_entries: 4 }))
}

fn req(url: &str) -> FitRequest {
    FitRequest {
        url: url.to_string(),
        count: 50,
        dest: Rect::new(0.0, 0.0, 100.0, 100.0),
        padding: 0.0,
        offset: Vec2::ZERO,
        outline_ratio: 0.6,
    }
}

#[test]
fn inline_load_publishes_before_returning() {
    let loader = TargetLoader::inline(cache());
    let slot = TargetSlot::new();
    let id = slot.begin_request();
    loader.load(req("square.svg"), slot.downgrade(), id, "k".into());
    let pts = slot.points().unwrap();
    assert_eq!(pts.len(), 50);
    assert!(!slot.is_fallback());
    assert_eq!(loader.pending(), 0);
}

#[test]
fn failures_publish_a_spiral_inside_dest() {
    let loader = TargetLoader::inline(cache());
    let slot = TargetSlot::new();
    let id = slot.begin_request();
    let mut r = req("missing.svg");
    r.offset = Vec2::new(1000.0, 0.0);
    loader.load(r, slot.downgrade(), id, "k".into());
    assert!(slot.is_fallback());
    let pts = slot.points().unwrap();
    assert_eq!(pts.len(), 50);
    assert!(pts.iter().all(|p| p.x >= 1000.0 && p.x <= 1100.0));
}

#[test]
fn pooled_loads_finish_by_wait_idle() {
    let loader = TargetLoader::pooled(cache(), Some(2)).unwrap();
    let slots: Vec<TargetSlot> = (0..6).map(|_| TargetSlot::new()).collect();
    for s in &slots {
        let id = s.begin_request();
        loader.load(req("square.svg"), s.downgrade(), id, "k".into());
    }
    loader.wait_idle();
    assert_eq!(loader.pending(), 0);
    for s in &slots {
        assert_eq!(s.points().unwrap().len(), 50);
    }
    assert_eq!(loader.cache().stats().svg_loads, 1);
    assert_eq!(loader.cache().stats().fitted_computes, 1);
}

#[test]
fn dropped_slot_discards_result() {
    let loader = TargetLoader::pooled(cache(), Some(1)).unwrap();
    let slot = TargetSlot::new();
    let id = slot.begin_request();
    let weak = slot.downgrade();
    drop(slot);
    loader.load(req("square.svg"), weak, id, "k".into());
    loader.wait_idle();
    assert_eq!(loader.pending(), 0);
}

#[test]
fn zero_threads_is_rejected() {
    assert!(TargetLoader::pooled(cache(), Some(0)).is_err());
}
