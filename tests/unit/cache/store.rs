use super::*;
use crate::cache::source::MemorySvgSource;

fn square_svg() -> &'static str {
    r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 40 40"><path d="M0 0 H40 V40 H0 Z"/></svg>"#
}

fn source_with(n: usize) -> Arc<MemorySvgSource> {
    let src = MemorySvgSource::new();
    for i in 0..n {
        src.insert(format!("s{i}.svg"), square_svg());
    }
    Arc::new(src)
}

fn req(url: &str, count: usize) -> FitRequest {
    FitRequest {
        url: url.to_string(),
        count,
        dest: Rect::new(0.0, 0.0, 200.0, 200.0),
        padding: 0.0,
        offset: Vec2::ZERO,
        outline_ratio: 1.0,
    }
}

#[test]
fn parsed_svg_is_loaded_once() {
    let src = source_with(1);
    let cache = SampleCache::new(src.clone(), CacheOpts { max_svg_entries: 4 });
    let a = cache.get_parsed_svg("s0.svg").unwrap();
    let b = cache.get_parsed_svg("s0.svg").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(src.fetch_count(), 1);
    assert_eq!(cache.stats().svg_loads, 1);
    assert_eq!(cache.stats().svg_hits, 1);
}

#[test]
fn eviction_is_fifo_by_insertion_not_access() {
    let src = source_with(4);
    let cache = SampleCache::new(src, CacheOpts { max_svg_entries: 2 });
    cache.get_parsed_svg("s0.svg").unwrap();
    cache.get_parsed_svg("s1.svg").unwrap();
    // touching s0 must not protect it
    cache.get_parsed_svg("s0.svg").unwrap();
    cache.get_parsed_svg("s2.svg").unwrap();
    assert_eq!(cache.cached_urls(), vec!["s1.svg", "s2.svg"]);
    cache.get_parsed_svg("s3.svg").unwrap();
    assert_eq!(cache.cached_urls(), vec!["s2.svg", "s3.svg"]);
    assert_eq!(cache.stats().evictions, 2);
}

#[test]
fn evicting_a_document_purges_its_fitted_sets() {
    let src = source_with(3);
    let cache = SampleCache::new(src, CacheOpts { max_svg_entries: 2 });
    cache.get_fitted_points(&req("s0.svg", 10)).unwrap();
    cache.get_fitted_points(&req("s0.svg", 20)).unwrap();
    cache.get_fitted_points(&req("s1.svg", 10)).unwrap();
    assert_eq!(cache.fitted_len_for("s0.svg"), 2);

    cache.get_parsed_svg("s2.svg").unwrap();
    assert_eq!(cache.fitted_len_for("s0.svg"), 0);
    assert_eq!(cache.fitted_len_for("s1.svg"), 1);
}

#[test]
fn fitted_points_are_cached_per_exact_tuple() {
    let src = source_with(1);
    let cache = SampleCache::new(src, CacheOpts { max_svg_entries: 4 });
    let a = cache.get_fitted_points(&req("s0.svg", 50)).unwrap();
    let b = cache.get_fitted_points(&req("s0.svg", 50)).unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    let mut shifted = req("s0.svg", 50);
    shifted.offset = Vec2::new(5.0, 0.0);
    let c = cache.get_fitted_points(&shifted).unwrap();
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(c[0], a[0] + Vec2::new(5.0, 0.0));
    assert_eq!(cache.stats().fitted_computes, 2);
    assert_eq!(cache.stats().fitted_hits, 1);
}

#[test]
fn fitted_points_are_identical_across_fresh_caches() {
    let a = SampleCache::new(source_with(1), CacheOpts { max_svg_entries: 4 })
        .get_fitted_points(&req("s0.svg", 64))
        .unwrap();
    let b = SampleCache::new(source_with(1), CacheOpts { max_svg_entries: 4 })
        .get_fitted_points(&req("s0.svg", 64))
        .unwrap();
    assert_eq!(&a[..], &b[..]);
}

#[test]
fn concurrent_requests_share_one_load() {
    let src = source_with(1);
    let cache = Arc::new(SampleCache::new(src.clone(), CacheOpts { max_svg_entries: 4 }));
    let results: Vec<Arc<[Point]>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                s.spawn(move || cache.get_fitted_points(&req("s0.svg", 32)).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(src.fetch_count(), 1);
    assert_eq!(cache.stats().fitted_computes, 1);
    for r in &results {
        assert!(Arc::ptr_eq(r, &results[0]));
    }
}

#[test]
fn failures_are_not_cached() {
    let src = Arc::new(MemorySvgSource::new());
    let cache = SampleCache::new(src.clone(), CacheOpts { max_svg_entries: 4 });
    assert!(matches!(
        cache.get_parsed_svg("late.svg"),
        Err(DotmorphError::Fetch(_))
    ));
    assert!(cache.cached_urls().is_empty());

    src.insert("late.svg", square_svg());
    assert!(cache.get_parsed_svg("late.svg").is_ok());
}

#[test]
fn empty_documents_fail_fitting() {
    let src = Arc::new(MemorySvgSource::new().with(
        "empty.svg",
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"></svg>"#,
    ));
    let cache = SampleCache::new(src, CacheOpts { max_svg_entries: 4 });
    assert!(matches!(
        cache.get_fitted_points(&req("empty.svg", 10)),
        Err(DotmorphError::Svg(_))
    ));
    assert_eq!(cache.fitted_len(), 0);
}

#[test]
fn clear_empties_both_levels() {
    let cache = SampleCache::new(source_with(2), CacheOpts { max_svg_entries: 4 });
    cache.get_fitted_points(&req("s0.svg", 10)).unwrap();
    cache.get_fitted_points(&req("s1.svg", 10)).unwrap();
    cache.clear();
    assert!(cache.cached_urls().is_empty());
    assert_eq!(cache.fitted_len(), 0);
}

#[test]
fn zero_capacity_is_clamped() {
    let cache = SampleCache::new(source_with(1), CacheOpts { max_svg_entries: 0 });
    assert_eq!(cache.opts().max_svg_entries, 1);
    cache.get_parsed_svg("s0.svg").unwrap();
    assert_eq!(cache.cached_urls(), vec!["s0.svg"]);
}
