/// Trailing-edge throttle for bursty host events (resize, remeasure).
///
/// The first [`Throttle::schedule`] in a quiet period arms a deadline one window ahead; later
/// calls before the deadline replace the pending value without moving it. [`Throttle::poll`]
/// hands out the latest value once the deadline passes, so at most one value fires per window.
#[derive(Clone, Debug)]
pub struct Throttle<T> {
    window_ms: f64,
    pending: Option<T>,
    due_ms: Option<f64>,
    last_fire_ms: Option<f64>,
}

impl<T> Throttle<T> {
    /// Throttle firing at most once per `window_ms`.
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms: window_ms.max(0.0),
            pending: None,
            due_ms: None,
            last_fire_ms: None,
        }
    }

    /// Window length in milliseconds.
    pub fn window_ms(&self) -> f64 {
        self.window_ms
    }

    /// Queue `value`, replacing anything not yet fired.
    pub fn schedule(&mut self, value: T, now_ms: f64) {
        self.pending = Some(value);
        if self.due_ms.is_none() {
            let earliest = self
                .last_fire_ms
                .map_or(f64::NEG_INFINITY, |t| t + self.window_ms);
            self.due_ms = Some((now_ms + self.window_ms).max(earliest));
        }
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now_ms: f64) -> Option<T> {
        let due = self.due_ms?;
        if now_ms < due {
            return None;
        }
        self.due_ms = None;
        self.last_fire_ms = Some(now_ms);
        self.pending.take()
    }

    /// Whether a value is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending value.
    pub fn due_ms(&self) -> Option<f64> {
        self.due_ms
    }

    /// Drop the pending value.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.due_ms = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/throttle.rs"]
mod tests;
