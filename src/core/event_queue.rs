use super::event::Event;
use super::types::SimTime;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct ScheduledEvent<E> {
    execution_time: SimTime,
    sequence_num: u64,
    event: Event<E>,
}

impl<E> PartialEq for ScheduledEvent<E> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<E> Eq for ScheduledEvent<E> {}

impl<E> PartialOrd for ScheduledEvent<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for ScheduledEvent<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .execution_time
            .total_cmp(&self.execution_time)
            .then_with(|| other.sequence_num.cmp(&self.sequence_num))
    }
}

/// Pending events ordered by execution time, ties broken by insertion order.
///
/// Events can be inserted sorted (the head is immediately the global
/// minimum) or appended unsorted into a side buffer that is merged into the
/// heap on the next operation that needs order. Bulk seeding with
/// [`add_unsorted`](Self::add_unsorted) therefore pays for a single heap
/// rebuild instead of one sift per insert.
#[derive(Debug)]
pub struct EventQueue<E> {
    ordered: BinaryHeap<ScheduledEvent<E>>,
    unsorted: Vec<ScheduledEvent<E>>,
    sequence_counter: u64,
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self {
            ordered: BinaryHeap::new(),
            unsorted: Vec::new(),
            sequence_counter: 0,
        }
    }

    fn schedule(&mut self, event: Event<E>) -> ScheduledEvent<E> {
        let scheduled = ScheduledEvent {
            execution_time: event.execution_time(),
            sequence_num: self.sequence_counter,
            event,
        };
        self.sequence_counter += 1;
        scheduled
    }

    /// Insert keeping the queue ordered; any pending unsorted events are merged first
    pub fn add_sorted(&mut self, event: Event<E>) {
        self.resort();
        let scheduled = self.schedule(event);
        self.ordered.push(scheduled);
    }

    /// Append without reordering. Order is restored lazily before the next removal.
    pub fn add_unsorted(&mut self, event: Event<E>) {
        let scheduled = self.schedule(event);
        self.unsorted.push(scheduled);
    }

    /// Merge unsorted appends back into the ordered heap
    pub fn resort(&mut self) {
        if !self.unsorted.is_empty() {
            self.ordered.extend(self.unsorted.drain(..));
        }
    }

    /// True when no unsorted appends are waiting to be merged
    pub fn is_ordered(&self) -> bool {
        self.unsorted.is_empty()
    }

    /// Remove the earliest event. `None` means there is no more work.
    pub fn remove_first(&mut self) -> Option<Event<E>> {
        self.resort();
        self.ordered.pop().map(|scheduled| scheduled.event)
    }

    /// Execution time of the event `remove_first` would return next
    pub fn peek_next_time(&mut self) -> Option<SimTime> {
        self.resort();
        self.ordered.peek().map(|scheduled| scheduled.execution_time)
    }

    pub fn count(&self) -> usize {
        self.ordered.len() + self.unsorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Keep only the events for which `keep` returns true; order and ties are preserved
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Event<E>) -> bool,
    {
        self.resort();
        self.ordered.retain(|scheduled| keep(&scheduled.event));
    }

    /// Drop every pending event and restart the insertion sequence
    pub fn clear(&mut self) {
        self.ordered.clear();
        self.unsorted.clear();
        self.sequence_counter = 0;
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}
