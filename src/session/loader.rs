use std::sync::{Arc, Condvar, Mutex, PoisonError};

use crate::cache::store::{FitRequest, SampleCache};
use crate::foundation::core::Point;
use crate::foundation::error::{DotmorphError, DotmorphResult};
use crate::sampling::fallback::spiral_fallback;
use crate::scene::slot::WeakTargetSlot;

#[derive(Default)]
struct Pending {
    count: Mutex<usize>,
    idle: Condvar,
}

impl Pending {
    fn begin(&self) {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }

    fn finish(&self) {
        let mut n = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *n = n.saturating_sub(1);
        if *n == 0 {
            self.idle.notify_all();
        }
    }

    fn get(&self) -> usize {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait_zero(&self) {
        let mut n = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        while *n > 0 {
            n = self.idle.wait(n).unwrap_or_else(PoisonError::into_inner);
        }
    }
}

enum Executor {
    Inline,
    Pool(rayon::ThreadPool),
}

/// Runs SVG fetch + sampling off the frame path and publishes the results into scene slots.
///
/// Failures never reach the caller: they are logged and replaced by the spiral fallback.
pub struct TargetLoader {
    cache: Arc<SampleCache>,
    executor: Executor,
    pending: Arc<Pending>,
}

impl std::fmt::Debug for TargetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetLoader")
            .field("inline", &matches!(self.executor, Executor::Inline))
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

impl TargetLoader {
    /// Loader that runs every request on the calling thread.
    pub fn inline(cache: Arc<SampleCache>) -> Self {
        Self {
            cache,
            executor: Executor::Inline,
            pending: Arc::default(),
        }
    }

    /// Loader backed by a dedicated worker pool.
    pub fn pooled(cache: Arc<SampleCache>, threads: Option<usize>) -> DotmorphResult<Self> {
        Ok(Self {
            cache,
            executor: Executor::Pool(build_thread_pool(threads)?),
            pending: Arc::default(),
        })
    }

    /// Shared cache.
    pub fn cache(&self) -> &Arc<SampleCache> {
        &self.cache
    }

    /// Requests queued or running.
    pub fn pending(&self) -> usize {
        self.pending.get()
    }

    /// Block until every queued request has published.
    pub fn wait_idle(&self) {
        self.pending.wait_zero();
    }

    /// Load `req` and publish it into `slot` under `request`.
    ///
    /// `fallback_key` seeds the spiral substituted on failure. A slot dropped before the result
    /// arrives discards it.
    pub fn load(&self, req: FitRequest, slot: WeakTargetSlot, request: u64, fallback_key: String) {
        let cache = Arc::clone(&self.cache);
        let pending = Arc::clone(&self.pending);
        pending.begin();
        let job = move || {
            let (points, fallback) = resolve(&cache, &req, &fallback_key);
            if !slot.publish(request, points, fallback) {
                tracing::debug!(url = %req.url, request, "dropped stale target result");
            }
            pending.finish();
        };
        match &self.executor {
            Executor::Inline => job(),
            Executor::Pool(pool) => pool.spawn(job),
        }
    }
}

#[tracing::instrument(level = "debug", skip(cache, req), fields(url = %req.url, count = req.count))]
fn resolve(cache: &SampleCache, req: &FitRequest, fallback_key: &str) -> (Arc<[Point]>, bool) {
    match cache.get_fitted_points(req) {
        Ok(points) if !points.is_empty() => (points, false),
        Ok(_) => {
            tracing::warn!(url = %req.url, "svg produced no points, using fallback");
            (fallback_points(req, fallback_key), true)
        }
        Err(e) => {
            tracing::warn!(url = %req.url, error = %e, "svg target failed, using fallback");
            (fallback_points(req, fallback_key), true)
        }
    }
}

fn fallback_points(req: &FitRequest, key: &str) -> Arc<[Point]> {
    let dest = req.dest + req.offset;
    spiral_fallback(req.count.max(1), dest, key).into()
}

fn build_thread_pool(threads: Option<usize>) -> DotmorphResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(DotmorphError::validation(
            "loader 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("dotmorph-load-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| DotmorphError::Other(anyhow::anyhow!("failed to build loader pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/loader.rs"]
mod tests;
