//! Scheduler-independent debouncing.
//!
//! A [`Debouncer`] holds at most one pending call. Scheduling again replaces
//! the pending call and pushes the deadline out. The host drives it by
//! calling [`Debouncer::poll`] with the current time from whatever timer it
//! has (`setTimeout`, an animation frame, a test clock).

use std::time::Duration;

use tracing::trace;
use web_time::Instant;

/// Identifies one scheduled call. A superseded handle no longer cancels anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Pending<K> {
    handle: TimerHandle,
    deadline: Instant,
    payload: K,
}

#[derive(Debug, Clone)]
pub struct Debouncer<K> {
    delay: Duration,
    pending: Option<Pending<K>>,
    next_handle: u64,
}

impl<K> Debouncer<K> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            next_handle: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `payload` to fire `delay` after `now`, superseding any pending call.
    pub fn schedule(&mut self, now: Instant, payload: K) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        if let Some(previous) = &self.pending {
            trace!(superseded = previous.handle.0, "debounce superseded");
        }
        self.pending = Some(Pending {
            handle,
            deadline: now + self.delay,
            payload,
        });
        handle
    }

    /// Take the pending payload if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<K> {
        if self.pending.as_ref()?.deadline > now {
            return None;
        }
        self.pending.take().map(|p| p.payload)
    }

    /// Cancel the pending call if `handle` still refers to it.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        if self.pending.as_ref().is_some_and(|p| p.handle == handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Drop whatever is pending.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending call is due, for hosts that arm a real timer.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(400));
        debouncer.schedule(start, "a");
        assert_eq!(debouncer.poll(start + Duration::from_millis(399)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(400)), Some("a"));
        assert_eq!(debouncer.poll(start + Duration::from_millis(800)), None);
    }

    #[test]
    fn test_later_schedule_supersedes() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(200));
        let first = debouncer.schedule(start, 1);
        debouncer.schedule(start + Duration::from_millis(150), 2);
        assert_eq!(debouncer.poll(start + Duration::from_millis(250)), None);
        assert!(!debouncer.cancel(first));
        assert_eq!(debouncer.poll(start + Duration::from_millis(350)), Some(2));
    }

    #[test]
    fn test_cancel_current() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        let handle = debouncer.schedule(start, ());
        assert!(debouncer.cancel(handle));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + Duration::from_secs(1)), None);
    }
}
