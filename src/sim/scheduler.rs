//! Virtual-time timer queue
//!
//! The session never registers callbacks with the host. Every countdown tick,
//! spawn tick and target expiry is an entry here, drained in deadline order by
//! whoever owns the clock. Cancelling a round is a single `clear()`.

use std::collections::BTreeMap;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId {
    due: u64,
    seq: u64,
}

impl TimerId {
    /// Deadline (ms)
    pub fn due(&self) -> u64 {
        self.due
    }
}

/// Timers ordered by deadline, then by scheduling order
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    timers: BTreeMap<TimerId, E>,
    next_seq: u64,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            timers: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `event` to fire at `due` (ms)
    pub fn schedule_at(&mut self, due: u64, event: E) -> TimerId {
        let id = TimerId {
            due,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.timers.insert(id, event);
        id
    }

    /// Cancel a pending timer, returning its event if it had not fired yet
    pub fn cancel(&mut self, id: TimerId) -> Option<E> {
        self.timers.remove(&id)
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Pop the earliest timer whose deadline is at or before `now`
    pub fn pop_due(&mut self, now: u64) -> Option<(u64, E)> {
        let (id, _) = self.timers.first_key_value()?;
        if id.due > now {
            return None;
        }
        self.timers.pop_first().map(|(id, event)| (id.due, event))
    }

    /// Deadline of the next pending timer
    pub fn next_due(&self) -> Option<u64> {
        self.timers.keys().next().map(|id| id.due)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_deadline_order() {
        let mut sched = Scheduler::new();
        sched.schedule_at(300, "c");
        sched.schedule_at(100, "a");
        sched.schedule_at(200, "b");

        assert_eq!(sched.pop_due(50), None);
        assert_eq!(sched.pop_due(1000), Some((100, "a")));
        assert_eq!(sched.pop_due(1000), Some((200, "b")));
        assert_eq!(sched.pop_due(1000), Some((300, "c")));
        assert_eq!(sched.pop_due(1000), None);
    }

    #[test]
    fn test_equal_deadlines_fire_fifo() {
        let mut sched = Scheduler::new();
        sched.schedule_at(100, 1);
        sched.schedule_at(100, 2);
        sched.schedule_at(100, 3);
        let fired: Vec<_> = std::iter::from_fn(|| sched.pop_due(100)).map(|(_, e)| e).collect();
        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn test_cancel_and_clear() {
        let mut sched = Scheduler::new();
        let a = sched.schedule_at(100, "a");
        sched.schedule_at(200, "b");
        assert_eq!(a.due(), 100);

        assert_eq!(sched.cancel(a), Some("a"));
        assert_eq!(sched.cancel(a), None);
        assert_eq!(sched.next_due(), Some(200));

        sched.clear();
        assert!(sched.is_empty());
        assert_eq!(sched.pop_due(u64::MAX), None);
    }
}
