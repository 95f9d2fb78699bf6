// SPDX-FileCopyrightText: 2026 Roomlink Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Signal Coalescing
//!
//! One primitive for both directions of typing signaling: the outbound
//! rate limit (at most one signal per window) and the inbound indicator
//! debounce (visible until a window passes with no new event) are the
//! same "coalesce events within a time window" pattern.

use std::time::{Duration, Instant};

/// Tracks the last event in a fixed time window.
#[derive(Debug, Clone)]
pub struct SignalWindow {
    window: Duration,
    last: Option<Instant>,
}

impl SignalWindow {
    /// Creates a window of the given length with no event recorded.
    pub fn new(window: Duration) -> Self {
        SignalWindow { window, last: None }
    }

    /// Rate-limit reading: records `now` and returns true if a full
    /// window has elapsed since the previous recorded event (or none was
    /// recorded). Returns false and records nothing otherwise.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        let open = self
            .last
            .map_or(true, |last| now.duration_since(last) >= self.window);
        if open {
            self.last = Some(now);
        }
        open
    }

    /// Debounce reading: unconditionally records `now`, restarting the
    /// window.
    pub fn touch(&mut self, now: Instant) {
        self.last = Some(now);
    }

    /// Returns true while the window since the last event has not lapsed.
    pub fn is_open(&self, now: Instant) -> bool {
        self.last
            .map_or(false, |last| now.duration_since(last) < self.window)
    }

    /// Forgets the last event.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
