//! Timed follow-up actions scheduled by the world.

use std::time::Duration;

/// Work the world performs once a deadline passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum DeferredAction {
    /// Stops the hit flash of the ground enemy at this hostile index.
    ClearEnemyHit {
        /// Index into the level's hostiles.
        hostile: usize,
    },
    /// Starts the level after the current one.
    AdvanceLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Scheduled {
    due: Duration,
    sequence: u64,
    action: DeferredAction,
}

/// Pending actions ordered by deadline, then by scheduling order.
#[derive(Clone, Debug, Default)]
pub(crate) struct DeferredQueue {
    pending: Vec<Scheduled>,
    next_sequence: u64,
}

impl DeferredQueue {
    pub(crate) fn schedule(&mut self, due: Duration, action: DeferredAction) {
        self.pending.push(Scheduled {
            due,
            sequence: self.next_sequence,
            action,
        });
        self.next_sequence = self.next_sequence.wrapping_add(1);
    }

    /// Removes and returns every action due at `now`, earliest first.
    pub(crate) fn drain_due(&mut self, now: Duration) -> Vec<DeferredAction> {
        if self.pending.is_empty() {
            return Vec::new();
        }

        let (mut due, waiting): (Vec<Scheduled>, Vec<Scheduled>) = self
            .pending
            .drain(..)
            .partition(|scheduled| scheduled.due <= now);
        self.pending = waiting;
        due.sort_by_key(|scheduled| (scheduled.due, scheduled.sequence));
        due.into_iter().map(|scheduled| scheduled.action).collect()
    }

    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}
