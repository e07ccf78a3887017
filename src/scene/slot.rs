use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::foundation::core::Point;

#[derive(Debug, Default)]
struct SlotState {
    points: Option<Arc<[Point]>>,
    fallback: bool,
    // id of the newest outstanding request; older results are stale
    request: u64,
    published: u64,
}

/// Where a scene's target points land once loaded.
///
/// Owned by the registry entry. Loaders only get a [`WeakTargetSlot`], so a result that arrives
/// after its scene was unmounted is dropped with the slot. Old points stay visible until a newer
/// request publishes.
#[derive(Clone, Debug, Default)]
pub struct TargetSlot {
    inner: Arc<Mutex<SlotState>>,
}

impl TargetSlot {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new request. Results tagged with an older id are ignored from now on.
    pub fn begin_request(&self) -> u64 {
        let mut st = self.lock();
        st.request += 1;
        st.request
    }

    /// Publish for `request` directly from the owning thread.
    pub fn publish(&self, request: u64, points: Arc<[Point]>, fallback: bool) -> bool {
        publish_into(&mut self.lock(), request, points, fallback)
    }

    /// Latest published points.
    pub fn points(&self) -> Option<Arc<[Point]>> {
        self.lock().points.clone()
    }

    /// Whether the latest points came from the procedural fallback.
    pub fn is_fallback(&self) -> bool {
        self.lock().fallback
    }

    /// Id of the request whose points are currently held; 0 before the first publish.
    pub fn published(&self) -> u64 {
        self.lock().published
    }

    /// Whether the newest request has not published yet.
    pub fn is_pending(&self) -> bool {
        let st = self.lock();
        st.published < st.request
    }

    /// Handle for a loader.
    pub fn downgrade(&self) -> WeakTargetSlot {
        WeakTargetSlot {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Non-owning handle given to off-frame loaders.
#[derive(Clone, Debug)]
pub struct WeakTargetSlot {
    inner: Weak<Mutex<SlotState>>,
}

impl WeakTargetSlot {
    /// Publish if the slot still exists and `request` is current. Returns whether it landed.
    pub fn publish(&self, request: u64, points: Arc<[Point]>, fallback: bool) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let mut st = inner.lock().unwrap_or_else(PoisonError::into_inner);
        publish_into(&mut st, request, points, fallback)
    }

    /// Whether the owning scene is still mounted.
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

fn publish_into(st: &mut SlotState, request: u64, points: Arc<[Point]>, fallback: bool) -> bool {
    if request != st.request || points.is_empty() {
        return false;
    }
    st.points = Some(points);
    st.fallback = fallback;
    st.published = request;
    true
}

#[cfg(test)]
#[path = "../../tests/unit/scene/slot.rs"]
mod tests;
