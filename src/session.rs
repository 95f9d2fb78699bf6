// SPDX-FileCopyrightText: 2026 Roomlink Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Room Session
//!
//! Identifies one chat room for one authenticated viewer. Built once from
//! the embedded page configuration and never mutated afterwards.

/// One chat room viewed by one authenticated participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSession {
    /// Room identifier.
    pub room_id: i64,
    /// Identity of the viewing participant.
    pub viewer_id: i64,
    /// Anti-forgery token, read once at page load and never refreshed.
    pub csrf_token: String,
}

impl RoomSession {
    /// Creates a session from the embedded page configuration.
    pub fn new(room_id: i64, viewer_id: i64, csrf_token: impl Into<String>) -> Self {
        RoomSession {
            room_id,
            viewer_id,
            csrf_token: csrf_token.into(),
        }
    }

    /// Returns true if a message with this sender belongs to the viewer.
    pub fn is_mine(&self, sender_id: i64) -> bool {
        sender_id == self.viewer_id
    }

    /// Builds the realtime channel address for this room.
    ///
    /// The scheme mirrors the page's own scheme: `wss` for secure pages,
    /// `ws` otherwise.
    pub fn channel_url(&self, host: &str, secure: bool) -> String {
        let scheme = if secure { "wss" } else { "ws" };
        format!("{}://{}/ws/chat/{}/", scheme, host, self.room_id)
    }
}
