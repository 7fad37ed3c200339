// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Send window used to bound the number of events in flight per round.
//!
//! The window grows by one event after every round that was fully
//! acknowledged and saturated the window, and halves after any failure.

use crate::constants::MIN_WINDOW_SIZE;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    current: usize,
    min: usize,
    max: usize,
}

impl Window {
    /// Creates a window starting at `start`, capped at `max`.
    pub fn new(start: usize, max: usize) -> Self {
        let max = max.max(MIN_WINDOW_SIZE);
        Window {
            current: start.clamp(MIN_WINDOW_SIZE, max),
            min: MIN_WINDOW_SIZE,
            max,
        }
    }

    pub fn get(&self) -> usize {
        self.current
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Grows the window after a fully acknowledged round. Rounds that did not
    /// fill the window say nothing about the endpoint's capacity and are ignored.
    pub fn try_grow(&mut self, last_batch_size: usize) {
        if last_batch_size < self.current || self.current >= self.max {
            return;
        }
        self.current += 1;
        debug!("window grown to {}", self.current);
    }

    pub fn shrink(&mut self) {
        let shrunk = (self.current / 2).max(self.min);
        if shrunk != self.current {
            debug!("window shrunk from {} to {}", self.current, shrunk);
            self.current = shrunk;
        }
    }
}
