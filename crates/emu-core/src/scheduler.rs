//! Frame-relative event scheduler.
//!
//! Events are stamped with an absolute T-state within the current frame and
//! handed back in stamp order once the cycle counter reaches them. When the
//! machine's cycle counter wraps at the end of a frame, [`Scheduler::rebase`]
//! shifts every pending stamp by the same amount.
//!
//! # Ordering
//!
//! The queue is kept sorted by stamp, with events of equal stamp in the order
//! they were added. Rebasing is a pure subtraction applied in place: an event
//! whose stamp would go below zero is clamped to zero but keeps its position,
//! so the firing order of pending events never changes across a rebase.

use std::collections::VecDeque;

/// One pending event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled<E> {
    /// T-state at which the event becomes due.
    pub at: u32,
    pub event: E,
}

/// Ordered queue of `(stamp, event)` pairs.
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    queue: VecDeque<Scheduled<E>>,
}

impl<E> Scheduler<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Schedule `event` at T-state `at`.
    ///
    /// An event added at the same stamp as existing ones fires after them.
    pub fn add(&mut self, at: u32, event: E) {
        let index = self.queue.partition_point(|pending| pending.at <= at);
        self.queue.insert(index, Scheduled { at, event });
    }

    /// Stamp of the earliest pending event.
    #[must_use]
    pub fn next_at(&self) -> Option<u32> {
        self.queue.front().map(|pending| pending.at)
    }

    /// Remove and return the earliest event if it is due at `now`.
    pub fn pop_due(&mut self, now: u32) -> Option<Scheduled<E>> {
        if self.next_at()? <= now {
            self.queue.pop_front()
        } else {
            None
        }
    }

    /// Remove every pending event regardless of stamp, in firing order.
    pub fn drain_all(&mut self) -> Vec<Scheduled<E>> {
        self.queue.drain(..).collect()
    }

    /// Subtract `delta` from every pending stamp.
    pub fn rebase(&mut self, delta: u32) {
        for pending in &mut self.queue {
            pending.at = pending.at.saturating_sub(delta);
        }
        log::trace!("rebased {} pending events by {delta}", self.queue.len());
    }

    /// Keep only the events for which `keep` returns true.
    pub fn retain(&mut self, keep: impl FnMut(&Scheduled<E>) -> bool) {
        self.queue.retain(keep);
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending events in firing order.
    pub fn iter(&self) -> impl Iterator<Item = &Scheduled<E>> {
        self.queue.iter()
    }
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}
