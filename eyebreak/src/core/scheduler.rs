use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Deterministic one-shot timer queue on a virtual clock.
///
/// The clock only moves when the owner pops due timers or calls
/// [`Scheduler::advance_to`]. Timers with the same deadline fire in the order
/// they were scheduled.
#[derive(Debug)]
pub struct Scheduler<E> {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, TimerId), E>,
    deadlines: HashMap<TimerId, Duration>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule_after(&mut self, delay: Duration, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = self.now + delay;
        self.queue.insert((deadline, id), event);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Returns false if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => self.queue.remove(&(deadline, id)).is_some(),
            None => false,
        }
    }

    pub fn cancel_all(&mut self) -> usize {
        let count = self.queue.len();
        self.queue.clear();
        self.deadlines.clear();
        count
    }

    #[cfg(test)]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Removes the earliest timer due at or before `until` and moves the clock
    /// to its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, E)> {
        let key = *self.queue.keys().next()?;
        if key.0 > until {
            return None;
        }
        let event = self.queue.remove(&key)?;
        self.deadlines.remove(&key.1);
        self.now = self.now.max(key.0);
        Some((key.1, event))
    }

    /// Moves the clock forward without firing anything.
    pub fn advance_to(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_pop_due_in_deadline_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_after(secs(3), "c");
        scheduler.schedule_after(secs(1), "a");
        scheduler.schedule_after(secs(2), "b");

        assert_eq!(scheduler.next_deadline(), Some(secs(1)));
        assert_eq!(scheduler.pop_due(secs(5)).map(|(_, e)| e), Some("a"));
        assert_eq!(scheduler.now(), secs(1));
        assert_eq!(scheduler.pop_due(secs(5)).map(|(_, e)| e), Some("b"));
        assert_eq!(scheduler.pop_due(secs(5)).map(|(_, e)| e), Some("c"));
        assert_eq!(scheduler.pop_due(secs(5)), None);
    }

    #[test]
    fn test_same_deadline_fires_in_schedule_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_after(secs(1), "lock");
        scheduler.schedule_after(secs(1), "end");

        assert_eq!(scheduler.pop_due(secs(1)).map(|(_, e)| e), Some("lock"));
        assert_eq!(scheduler.pop_due(secs(1)).map(|(_, e)| e), Some("end"));
    }

    #[test]
    fn test_not_due_yet() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_after(secs(2), ());
        assert!(scheduler.pop_due(secs(1)).is_none());
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_schedule_is_relative_to_virtual_now() {
        let mut scheduler = Scheduler::new();
        scheduler.advance_to(secs(10));
        scheduler.schedule_after(secs(1), ());
        assert_eq!(scheduler.next_deadline(), Some(secs(11)));

        // The clock never runs backwards.
        scheduler.advance_to(secs(5));
        assert_eq!(scheduler.now(), secs(10));
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.schedule_after(secs(1), "a");
        let b = scheduler.schedule_after(secs(2), "b");

        assert!(scheduler.cancel(a));
        assert!(!scheduler.cancel(a));
        assert!(!scheduler.is_pending(a));
        assert!(scheduler.is_pending(b));
        assert_eq!(scheduler.pop_due(secs(5)).map(|(_, e)| e), Some("b"));
        assert!(!scheduler.cancel(b));
    }

    #[test]
    fn test_cancel_all() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_after(secs(1), ());
        scheduler.schedule_after(secs(2), ());
        assert_eq!(scheduler.cancel_all(), 2);
        assert_eq!(scheduler.next_deadline(), None);
    }
}
