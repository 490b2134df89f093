//! Deferred tasks executed at tick boundaries
//!
//! Flash restoration used to be a free-running timer callback. Here it is a
//! task queued on the simulation itself and drained by the tick, so nothing
//! ever mutates a disk outside the simulation's own thread of control.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::disk::DiskId;

/// Milliseconds on the host clock
pub type Millis = u64;

/// Work deferred to a later tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Put the disk back to its base color
    RestoreColor { disk: DiskId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Scheduled {
    due: Millis,
    /// Insertion order, keeps same-`due` tasks FIFO
    seq: u64,
    task: DeferredTask,
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want the earliest first
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Time-ordered queue of deferred tasks
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to run once the clock reaches `due`
    pub fn schedule(&mut self, due: Millis, task: DeferredTask) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled { due, seq, task });
    }

    /// Pop every task due at or before `now`, earliest first
    pub fn drain_due(&mut self, now: Millis) -> Vec<DeferredTask> {
        let mut due = Vec::new();
        while self.heap.peek().is_some_and(|s| s.due <= now) {
            if let Some(s) = self.heap.pop() {
                due.push(s.task);
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
