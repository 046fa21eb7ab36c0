//! Time-ordered event queue.
//!
//! Events are totally ordered by `(time, kind, task_id, seq)`:
//! completions sort before arrivals at the same timestamp so machines freed
//! at `t` are visible to tasks arriving at `t`. `seq` is the insertion
//! counter and only matters if everything else collides.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::models::{MachineId, SimTime, TaskId};

/// A simulation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Task becomes known to the engine.
    Arrival {
        /// Arriving task.
        task_id: TaskId,
    },
    /// Task finishes on a machine.
    Completion {
        /// Finishing task.
        task_id: TaskId,
        /// Machine it ran on.
        machine_id: MachineId,
    },
}

impl Event {
    fn kind_rank(&self) -> u8 {
        match self {
            Event::Completion { .. } => 0,
            Event::Arrival { .. } => 1,
        }
    }

    /// Task the event refers to.
    pub fn task_id(&self) -> TaskId {
        match *self {
            Event::Arrival { task_id } | Event::Completion { task_id, .. } => task_id,
        }
    }
}

/// An event with its firing time.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledEvent {
    /// Firing time.
    pub time: SimTime,
    /// Payload.
    pub event: Event,
    seq: u64,
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.event.kind_rank().cmp(&other.event.kind_rank()))
            .then_with(|| self.event.task_id().cmp(&other.event.task_id()))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEvent {}

/// Min-priority queue of pending events.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<ScheduledEvent>>,
    next_seq: u64,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an event. O(log n).
    pub fn push(&mut self, time: SimTime, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(ScheduledEvent { time, event, seq }));
    }

    /// Removes and returns the earliest event.
    pub fn pop_min(&mut self) -> Option<ScheduledEvent> {
        self.heap.pop().map(|Reverse(e)| e)
    }

    /// Time of the earliest event.
    pub fn peek_time(&self) -> Option<SimTime> {
        self.heap.peek().map(|Reverse(e)| e.time)
    }

    /// Removes every event firing exactly at the earliest timestamp, in order.
    pub fn pop_batch(&mut self) -> Vec<ScheduledEvent> {
        let mut batch = Vec::new();
        let Some(first) = self.pop_min() else {
            return batch;
        };
        let time = first.time;
        batch.push(first);
        while self.peek_time() == Some(time) {
            if let Some(next) = self.pop_min() {
                batch.push(next);
            }
        }
        batch
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no events are pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
