// SPDX-FileCopyrightText: 2026 Roomlink Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Message Reconciler
//!
//! Idempotent application of inbound messages to the view, regardless of
//! which transport delivered them. During a Live/Degraded handoff the same
//! message can legitimately arrive twice (channel echo plus poll
//! re-delivery); deduplication by identifier absorbs that here so the
//! rest of the client never sees a repeat.

use std::collections::HashSet;

use crate::message::ChatMessage;

/// Outcome of applying one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The message was new and is now part of the view.
    Appended {
        /// True if this append was the first ever, i.e. the empty-room
        /// placeholder should be removed. Reported exactly once.
        cleared_empty_state: bool,
    },
    /// A message with this identifier was already rendered; dropped.
    Duplicate,
}

/// Merges inbound messages into an append-only view and maintains the
/// read watermark used to bound poll requests.
#[derive(Debug, Default)]
pub struct Reconciler {
    seen: HashSet<i64>,
    messages: Vec<ChatMessage>,
    watermark: Option<String>,
    any_rendered: bool,
}

impl Reconciler {
    /// Creates an empty reconciler.
    pub fn new() -> Self {
        Reconciler::default()
    }

    /// Applies one inbound message.
    ///
    /// A message whose identifier is already present is discarded.
    /// Otherwise it is appended in arrival order and the watermark is
    /// advanced if its timestamp exceeds the current one. Messages
    /// without a timestamp are rendered but never move the watermark.
    pub fn apply(&mut self, message: ChatMessage) -> Applied {
        if !self.seen.insert(message.id) {
            return Applied::Duplicate;
        }

        let cleared_empty_state = !self.any_rendered;
        self.any_rendered = true;

        if let Some(ts) = &message.timestamp {
            // ISO-8601 UTC timestamps order correctly as strings
            if self.watermark.as_deref().map_or(true, |w| ts.as_str() > w) {
                self.watermark = Some(ts.clone());
            }
        }

        self.messages.push(message);
        Applied::Appended {
            cleared_empty_state,
        }
    }

    /// Flags every message the viewer sent as read by a peer.
    ///
    /// A view-only overlay keyed by identifier; message content is never
    /// mutated. Returns the number of messages whose flag changed.
    pub fn mark_read_by_peer(&mut self) -> usize {
        let mut changed = 0;
        for message in self.messages.iter_mut() {
            if message.is_mine && !message.seen_by_peer {
                message.seen_by_peer = true;
                changed += 1;
            }
        }
        changed
    }

    /// Latest observed timestamp, the `after=` bound for the next poll.
    pub fn watermark(&self) -> Option<&str> {
        self.watermark.as_deref()
    }

    /// The reconciled view in arrival order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns true if a message with this identifier has been rendered.
    pub fn contains(&self, id: i64) -> bool {
        self.seen.contains(&id)
    }

    /// Number of rendered messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if nothing has been rendered yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
