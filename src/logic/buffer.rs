//! Sliding window buffer
//!
//! Bounded trailing history of the N most recent closed windows. Every
//! admission at capacity re-aggregates the full history, so each scoring
//! decision sees the current last-N windows rather than a fixed batch.

use std::collections::VecDeque;

use super::features::{aggregate, TrafficAggregate};
use super::window::Window;

pub struct SlidingWindowBuffer {
    capacity: usize,
    windows: VecDeque<Window>,
}

impl SlidingWindowBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            windows: VecDeque::with_capacity(capacity + 1),
        }
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Admit one closed window, evicting the oldest when over capacity.
    ///
    /// Returns an aggregate of the full history exactly when the buffer
    /// holds `capacity` windows after admission; during warm-up it returns
    /// `None` and no scoring decision is made.
    pub fn admit(&mut self, window: Window) -> Option<TrafficAggregate> {
        self.windows.push_back(window);
        if self.windows.len() > self.capacity {
            self.windows.pop_front();
        }

        if self.windows.len() == self.capacity {
            Some(aggregate(self.windows.iter()))
        } else {
            None
        }
    }
}
