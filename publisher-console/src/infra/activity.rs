//! Reference-counted busy signal shared by every network call site.
//!
//! Many overlapping requests collapse into one boolean: the tracker emits
//! `true` when the in-flight count leaves zero and `false` when it returns
//! to zero, and nothing for intermediate counts. One tracker is created at
//! startup and handed to the gateway (and anyone who wants to observe it);
//! it is never a process global.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Live stream of busy transitions. Starts with the value current at
/// subscription time.
pub type BusyStream = UnboundedReceiverStream<bool>;

#[derive(Default)]
struct TrackerState {
    in_flight: usize,
    subscribers: Vec<mpsc::UnboundedSender<bool>>,
}

impl TrackerState {
    fn emit(&mut self, busy: bool) {
        self.subscribers
            .retain(|subscriber| subscriber.send(busy).is_ok());
    }
}

/// Shared handle to the in-flight counter. Cloning yields another handle to
/// the same counter.
#[derive(Clone, Default)]
pub struct ActivityTracker {
    state: Arc<Mutex<TrackerState>>,
}

impl fmt::Debug for ActivityTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ActivityTracker")
            .field("in_flight", &state.in_flight)
            .field("subscribers", &state.subscribers.len())
            .finish()
    }
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks one more operation as in flight.
    pub fn begin(&self) {
        let mut state = self.state.lock();
        state.in_flight += 1;
        if state.in_flight == 1 {
            state.emit(true);
        }
    }

    /// Marks one operation as settled. A surplus call at zero is ignored.
    pub fn end(&self) {
        let mut state = self.state.lock();
        if state.in_flight == 0 {
            debug!("[Activity] end() without matching begin(); ignoring");
            return;
        }
        state.in_flight -= 1;
        if state.in_flight == 0 {
            state.emit(false);
        }
    }

    /// Forces the counter to zero and always emits `false`.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        if state.in_flight > 0 {
            warn!(
                "[Activity] reset with {} operation(s) still in flight",
                state.in_flight
            );
        }
        state.in_flight = 0;
        state.emit(false);
    }

    /// Subscribes to busy transitions. The current value is delivered first.
    pub fn observe(&self) -> BusyStream {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut state = self.state.lock();
        // The receiver is alive, so this send cannot fail.
        let _ = sender.send(state.in_flight > 0);
        state.subscribers.push(sender);
        UnboundedReceiverStream::new(receiver)
    }

    /// Begins an operation and returns a guard that ends it when dropped.
    pub fn track(&self) -> ActivityGuard {
        self.begin();
        ActivityGuard {
            tracker: self.clone(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state.lock().in_flight > 0
    }

    pub fn in_flight(&self) -> usize {
        self.state.lock().in_flight
    }
}

/// Ends its operation exactly once, on drop, whatever way the operation
/// settled (success, error, panic or a dropped future).
#[must_use = "dropping the guard immediately ends the tracked operation"]
#[derive(Debug)]
pub struct ActivityGuard {
    tracker: ActivityTracker,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.tracker.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{FutureExt, StreamExt};

    /// Everything already emitted to `stream`, without waiting.
    fn drain(stream: &mut BusyStream) -> Vec<bool> {
        let mut seen = Vec::new();
        while let Some(Some(value)) = stream.next().now_or_never() {
            seen.push(value);
        }
        seen
    }

    #[test]
    fn emits_only_on_zero_crossings() {
        let tracker = ActivityTracker::new();
        let mut events = tracker.observe();

        tracker.begin();
        tracker.begin();
        tracker.begin();
        tracker.end();
        tracker.end();
        tracker.end();
        tracker.begin();
        tracker.end();

        // Replayed initial value, then one pair per busy period.
        assert_eq!(drain(&mut events), vec![false, true, false, true, false]);
    }

    #[test]
    fn surplus_end_floors_at_zero() {
        let tracker = ActivityTracker::new();
        let mut events = tracker.observe();

        tracker.end();
        tracker.end();
        assert_eq!(tracker.in_flight(), 0);

        tracker.begin();
        assert!(tracker.is_busy());
        tracker.end();
        assert!(!tracker.is_busy());

        assert_eq!(drain(&mut events), vec![false, true, false]);
    }

    #[test]
    fn reset_always_emits_idle() {
        let tracker = ActivityTracker::new();
        let mut events = tracker.observe();

        tracker.reset();
        tracker.begin();
        tracker.begin();
        tracker.reset();
        assert_eq!(tracker.in_flight(), 0);

        // After a reset the next begin is a fresh 0 -> 1 transition.
        tracker.begin();

        assert_eq!(drain(&mut events), vec![false, false, true, false, true]);
    }

    #[test]
    fn late_subscriber_sees_current_value_first() {
        let tracker = ActivityTracker::new();
        tracker.begin();

        let mut late = tracker.observe();
        assert_eq!(drain(&mut late), vec![true]);

        tracker.end();
        assert_eq!(drain(&mut late), vec![false]);
    }

    #[test]
    fn guard_ends_on_drop() {
        let tracker = ActivityTracker::new();
        {
            let _first = tracker.track();
            let _second = tracker.track();
            assert_eq!(tracker.in_flight(), 2);
        }
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let tracker = ActivityTracker::new();
        let events = tracker.observe();
        drop(events);

        tracker.begin();
        tracker.end();

        assert!(format!("{tracker:?}").contains("subscribers: 0"));
    }
}
