//! Bounded position history backing the rewind mechanic.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::{Point, TIME_BACK_MAX_FRAMES};

/// Stack of previous positions with a fixed capacity.
///
/// Pushing past capacity evicts the oldest entry, popping returns the most
/// recent one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionHistory {
    entries: VecDeque<Point>,
    capacity: usize,
}

impl PositionHistory {
    /// Creates an empty history holding at most `capacity` positions.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a position, evicting the oldest one when full.
    pub fn push(&mut self, position: Point) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_back(position);
        while self.entries.len() > self.capacity {
            let _ = self.entries.pop_front();
        }
    }

    /// Removes and returns the most recent position, if any.
    pub fn pop(&mut self) -> Option<Point> {
        self.entries.pop_back()
    }

    /// Number of stored positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no positions are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of positions retained.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every stored position.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for PositionHistory {
    fn default() -> Self {
        Self::with_capacity(TIME_BACK_MAX_FRAMES as usize)
    }
}

/// Entities that keep a [`PositionHistory`] for rewinding.
pub trait Rewindable: crate::Positioned {
    /// Mutable access to the entity's history.
    fn history_mut(&mut self) -> &mut PositionHistory;

    /// Read-only access to the entity's history.
    fn history(&self) -> &PositionHistory;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_returns_latest_first() {
        let mut history = PositionHistory::with_capacity(4);
        history.push(Point::new(1.0, 0.0));
        history.push(Point::new(2.0, 0.0));
        assert_eq!(history.pop(), Some(Point::new(2.0, 0.0)));
        assert_eq!(history.pop(), Some(Point::new(1.0, 0.0)));
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn overflow_evicts_oldest() {
        let mut history = PositionHistory::with_capacity(3);
        for step in 0..5 {
            history.push(Point::new(step as f32, 0.0));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.pop(), Some(Point::new(4.0, 0.0)));
        assert_eq!(history.pop(), Some(Point::new(3.0, 0.0)));
        assert_eq!(history.pop(), Some(Point::new(2.0, 0.0)));
        assert!(history.is_empty());
    }

    #[test]
    fn zero_capacity_never_stores() {
        let mut history = PositionHistory::with_capacity(0);
        history.push(Point::new(1.0, 1.0));
        assert!(history.is_empty());
    }

    #[test]
    fn default_capacity_is_two_seconds_of_ticks() {
        assert_eq!(PositionHistory::default().capacity(), 120);
    }
}
