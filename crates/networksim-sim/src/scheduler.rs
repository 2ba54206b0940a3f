//! The cooperative virtual-time scheduler.
//!
//! A max-heap whose `Ord` impl is reversed so the smallest key pops first,
//! with a secondary key breaking ties. The secondary key is an
//! insertion-order sequence number, giving a stable FIFO tie-break for wakes
//! scheduled at the same virtual time.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::trace;

use crate::task::TaskId;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScheduledWake {
    wake_time: f64,
    sequence: u64,
    task: TaskId,
}

impl Eq for ScheduledWake {}

impl Ord for ScheduledWake {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse order to get the smallest wake_time first out of a max-heap
        other
            .wake_time
            .partial_cmp(&self.wake_time)
            .expect("wake times are never NaN")
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for ScheduledWake {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A min-heap of pending wakes, plus the current virtual time.
#[derive(Debug, Clone)]
pub struct Scheduler {
    queue: BinaryHeap<ScheduledWake>,
    next_sequence: u64,
    now: f64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Construct a scheduler with virtual time starting at `0.0`.
    pub fn new() -> Self {
        Scheduler {
            queue: BinaryHeap::new(),
            next_sequence: 0,
            now: 0.0,
        }
    }

    /// The current virtual time: the wake_time of the most recently popped
    /// task, or `0.0` before the first pop.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of pending wakes.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// `true` if no task is pending.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Schedule `task` to wake at `wake_time`, breaking ties with other tasks
    /// scheduled for the same instant in the order they were pushed.
    pub fn schedule(&mut self, wake_time: f64, task: TaskId) {
        trace!("scheduler: {task:?} wakes at t={wake_time}");
        self.queue.push(ScheduledWake {
            wake_time,
            sequence: self.next_sequence,
            task,
        });
        self.next_sequence += 1;
    }

    /// Pop the earliest pending task, advancing `now` to its wake_time.
    /// Returns `None` if the queue is empty.
    pub fn pop_next(&mut self) -> Option<(f64, TaskId)> {
        let wake = self.queue.pop()?;
        self.now = wake.wake_time;
        Some((wake.wake_time, wake.task))
    }

    /// Abort the run: drop every pending wake.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_time_order() {
        let mut s = Scheduler::new();
        s.schedule(5.0, TaskId::Ram(0));
        s.schedule(1.0, TaskId::Ram(1));
        s.schedule(3.0, TaskId::Ram(2));
        assert_eq!(s.pop_next(), Some((1.0, TaskId::Ram(1))));
        assert_eq!(s.pop_next(), Some((3.0, TaskId::Ram(2))));
        assert_eq!(s.pop_next(), Some((5.0, TaskId::Ram(0))));
        assert_eq!(s.pop_next(), None);
    }

    #[test]
    fn ties_broken_by_insertion_order() {
        let mut s = Scheduler::new();
        s.schedule(1.0, TaskId::Ram(0));
        s.schedule(1.0, TaskId::Ram(1));
        s.schedule(1.0, TaskId::Ram(2));
        assert_eq!(s.pop_next(), Some((1.0, TaskId::Ram(0))));
        assert_eq!(s.pop_next(), Some((1.0, TaskId::Ram(1))));
        assert_eq!(s.pop_next(), Some((1.0, TaskId::Ram(2))));
    }

    #[test]
    fn now_tracks_last_popped_wake() {
        let mut s = Scheduler::new();
        assert_eq!(s.now(), 0.0);
        s.schedule(7.0, TaskId::RxData(0));
        s.pop_next();
        assert_eq!(s.now(), 7.0);
    }
}
