use std::time::{Duration, Instant};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Holds the latest pushed value until `delay` has passed without another
/// push. Each push restarts the timer.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Take the value if its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = matches!(self.pending, Some((_, deadline)) if now >= deadline);
        if due {
            self.pending.take().map(|(v, _)| v)
        } else {
            None
        }
    }

    /// Time left before the pending value fires
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, deadline)| deadline.saturating_duration_since(now))
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending value and return it, bypassing the delay
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }
}
