use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// One per-frame reading of the scroll container.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportSample {
    /// Document scroll offset in pixels.
    pub scroll_y: f64,
    /// Viewport width in pixels.
    pub width: f64,
    /// Viewport height in pixels.
    pub height: f64,
    /// Scroll velocity in pixels per second (provider-supplied or derived).
    pub velocity: f64,
    /// Frame timestamp in milliseconds.
    pub time_ms: f64,
}

/// The single injection point for scroll position and viewport size.
pub trait ViewportProvider {
    /// Current scroll offset.
    fn scroll_y(&self) -> f64;
    /// Current `(width, height)`.
    fn viewport_size(&self) -> (f64, f64);
    /// Scroll velocity if the host tracks it; otherwise the ticker derives one.
    fn velocity(&self) -> Option<f64> {
        None
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct StaticState {
    scroll_y: f64,
    width: f64,
    height: f64,
}

/// Host-settable provider. Clones share state, so the host keeps a handle after handing one to
/// the ticker.
#[derive(Clone, Debug, Default)]
pub struct StaticViewport {
    state: Rc<Cell<StaticState>>,
}

impl StaticViewport {
    /// Provider reporting a `width` x `height` viewport scrolled to the top.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            state: Rc::new(Cell::new(StaticState {
                scroll_y: 0.0,
                width,
                height,
            })),
        }
    }

    /// Update the scroll offset.
    pub fn set_scroll(&self, scroll_y: f64) {
        let mut s = self.state.get();
        s.scroll_y = scroll_y;
        self.state.set(s);
    }

    /// Update the viewport size.
    pub fn set_size(&self, width: f64, height: f64) {
        let mut s = self.state.get();
        s.width = width;
        s.height = height;
        self.state.set(s);
    }
}

impl ViewportProvider for StaticViewport {
    fn scroll_y(&self) -> f64 {
        self.state.get().scroll_y
    }

    fn viewport_size(&self) -> (f64, f64) {
        let s = self.state.get();
        (s.width, s.height)
    }
}

/// Handle for one requested animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequestId(pub u64);

/// The animation-frame clock the ticker runs on.
pub trait FrameScheduler {
    /// Ask for one callback on the next frame.
    fn request_frame(&mut self) -> FrameRequestId;
    /// Withdraw a request that has not fired yet.
    fn cancel_frame(&mut self, id: FrameRequestId);
}

#[derive(Debug, Default)]
struct ManualState {
    next_id: u64,
    pending: Option<FrameRequestId>,
    requested: u64,
    cancelled: u64,
}

/// Scheduler for hosts that drive frames themselves (CLI, tests, embedding loops).
///
/// Records the outstanding request; the host takes it with [`ManualScheduler::take_pending`]
/// and runs [`ViewportTicker::on_frame`].
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    /// Fresh scheduler with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// The outstanding frame request, if any.
    pub fn pending(&self) -> Option<FrameRequestId> {
        self.state.borrow().pending
    }

    /// Consume the outstanding request; the host then calls [`ViewportTicker::on_frame`].
    pub fn take_pending(&self) -> Option<FrameRequestId> {
        self.state.borrow_mut().pending.take()
    }

    /// Total requests made.
    pub fn requested(&self) -> u64 {
        self.state.borrow().requested
    }

    /// Total cancellations made.
    pub fn cancelled(&self) -> u64 {
        self.state.borrow().cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequestId {
        let mut s = self.state.borrow_mut();
        s.next_id += 1;
        s.requested += 1;
        let id = FrameRequestId(s.next_id);
        s.pending = Some(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        let mut s = self.state.borrow_mut();
        if s.pending == Some(id) {
            s.pending = None;
            s.cancelled += 1;
        }
    }
}

type Callback = Box<dyn FnMut(&ViewportSample)>;

struct TickerInner {
    provider: Box<dyn ViewportProvider>,
    scheduler: Box<dyn FrameScheduler>,
    subscribers: Vec<(u64, Callback)>,
    next_id: u64,
    pending_frame: Option<FrameRequestId>,
    last: Option<ViewportSample>,
    dispatching: bool,
    removed_while_dispatching: Vec<u64>,
}

impl TickerInner {
    fn sample(&mut self, now_ms: f64) -> ViewportSample {
        let scroll_y = self.provider.scroll_y();
        let (width, height) = self.provider.viewport_size();
        let velocity = self.provider.velocity().unwrap_or_else(|| match self.last {
            Some(prev) if now_ms > prev.time_ms => {
                (scroll_y - prev.scroll_y) / ((now_ms - prev.time_ms) / 1000.0)
            }
            _ => 0.0,
        });
        let sample = ViewportSample {
            scroll_y,
            width,
            height,
            velocity,
            time_ms: now_ms,
        };
        self.last = Some(sample);
        sample
    }

    fn ensure_frame(&mut self) {
        if self.pending_frame.is_none() {
            self.pending_frame = Some(self.scheduler.request_frame());
        }
    }

    fn stop(&mut self) {
        if let Some(id) = self.pending_frame.take() {
            self.scheduler.cancel_frame(id);
        }
        self.last = None;
        tracing::debug!("viewport ticker stopped");
    }

    fn remove(&mut self, id: u64) {
        if self.dispatching {
            self.removed_while_dispatching.push(id);
            return;
        }
        self.subscribers.retain(|(sid, _)| *sid != id);
        if self.subscribers.is_empty() {
            self.stop();
        }
    }
}

impl Drop for TickerInner {
    fn drop(&mut self) {
        if let Some(id) = self.pending_frame.take() {
            self.scheduler.cancel_frame(id);
        }
    }
}

/// Shared scroll/viewport clock.
///
/// Samples the provider once per frame and fans the sample out to every subscriber. Runs only
/// while it has subscribers: the first subscription requests a frame, dropping the last one
/// cancels the outstanding request. Cloning yields another handle to the same ticker.
#[derive(Clone)]
pub struct ViewportTicker {
    inner: Rc<RefCell<TickerInner>>,
}

impl ViewportTicker {
    /// Create a stopped ticker.
    pub fn new(provider: Box<dyn ViewportProvider>, scheduler: Box<dyn FrameScheduler>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TickerInner {
                provider,
                scheduler,
                subscribers: Vec::new(),
                next_id: 0,
                pending_frame: None,
                last: None,
                dispatching: false,
                removed_while_dispatching: Vec::new(),
            })),
        }
    }

    /// Register `callback` for every subsequent frame. The returned handle unsubscribes on drop.
    pub fn subscribe(&self, callback: impl FnMut(&ViewportSample) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.subscribers.push((id, Box::new(callback)));
        if !inner.dispatching {
            if inner.subscribers.len() == 1 {
                tracing::debug!("viewport ticker started");
            }
            inner.ensure_frame();
        }
        Subscription {
            id,
            ticker: Rc::downgrade(&self.inner),
        }
    }

    /// Whether any subscriber is registered.
    pub fn is_running(&self) -> bool {
        let inner = self.inner.borrow();
        !inner.subscribers.is_empty() || inner.dispatching
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Whether a frame request is outstanding.
    pub fn has_pending_frame(&self) -> bool {
        self.inner.borrow().pending_frame.is_some()
    }

    /// Most recent sample, if the ticker has run since it last started.
    pub fn latest(&self) -> Option<ViewportSample> {
        self.inner.borrow().last
    }

    /// Run one frame: sample once, notify every subscriber, schedule the next frame.
    ///
    /// Returns `false` without sampling when the ticker is stopped.
    pub fn on_frame(&self, now_ms: f64) -> bool {
        let (sample, mut subs) = {
            let mut inner = self.inner.borrow_mut();
            if inner.subscribers.is_empty() {
                return false;
            }
            inner.pending_frame = None;
            let sample = inner.sample(now_ms);
            inner.dispatching = true;
            (sample, std::mem::take(&mut inner.subscribers))
        };

        for (_, cb) in subs.iter_mut() {
            cb(&sample);
        }

        let mut inner = self.inner.borrow_mut();
        inner.dispatching = false;
        subs.append(&mut inner.subscribers);
        let removed = std::mem::take(&mut inner.removed_while_dispatching);
        subs.retain(|(id, _)| !removed.contains(id));
        inner.subscribers = subs;
        if inner.subscribers.is_empty() {
            inner.stop();
        } else {
            inner.ensure_frame();
        }
        true
    }
}

/// Live registration with a [`ViewportTicker`]. Dropping it unsubscribes synchronously.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    ticker: Weak<RefCell<TickerInner>>,
}

impl Subscription {
    /// Explicitly unsubscribe.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.ticker.upgrade() {
            inner.borrow_mut().remove(self.id);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/ticker.rs"]
mod tests;
