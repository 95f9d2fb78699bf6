// SPDX-FileCopyrightText: 2026 Roomlink Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Message Types
//!
//! Wire protocol types for the realtime channel and the HTTP endpoints,
//! plus the domain message the reconciler maintains.
//!
//! The channel and the HTTP API name the same fields differently
//! (`message_id`/`message` over the channel, `id`/`content` from the
//! endpoints); [`WireMessage`] absorbs both spellings with serde aliases.

use serde::{Deserialize, Serialize};

/// One chat message as delivered on the wire, by either transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Message identifier, unique within the room.
    #[serde(alias = "id")]
    pub message_id: i64,
    /// Identity of the sender.
    pub sender_id: i64,
    /// Display name of the sender.
    #[serde(default)]
    pub sender_name: String,
    /// Body text. Attachment-only messages may omit it.
    #[serde(alias = "content", default)]
    pub message: Option<String>,
    /// Attachment URL, if any.
    #[serde(default)]
    pub attachment: Option<String>,
    /// ISO-8601 creation timestamp. The ordering key for the watermark.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Events pushed by the server over the realtime channel.
///
/// Unrecognized `type` values decode as [`ServerEvent::Unknown`] and are
/// dropped by the client, keeping the wire format forward compatible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A chat message, freshly sent by any participant (including the
    /// viewer: the server echoes sends back through the channel).
    ChatMessage(WireMessage),
    /// Another participant is typing.
    Typing,
    /// Another participant marked the room's messages as read.
    MessagesRead {
        /// Identity of the reading participant.
        reader_id: i64,
    },
    /// Unrecognized event type (forward compatibility).
    #[serde(other)]
    Unknown,
}

/// Frames the client sends over the realtime channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Submit a composed message.
    ChatMessage {
        /// Body text.
        message: String,
    },
    /// Advertise transient typing state.
    Typing,
    /// Acknowledge everything delivered so far as read.
    MarkRead,
}

/// Poll endpoint response: all messages after the supplied watermark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollResponse {
    /// Messages in room order.
    pub messages: Vec<WireMessage>,
}

/// Send/upload endpoint response: a message representation or `{error}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiReply {
    /// The server rejected the request.
    Rejected {
        /// Human-readable reason.
        error: String,
    },
    /// The stored message.
    Message(WireMessage),
}

/// One chat message in the reconciled view.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Message identifier, unique within the room.
    pub id: i64,
    /// Identity of the sender.
    pub sender_id: i64,
    /// Display name of the sender.
    pub sender_name: String,
    /// Body text.
    pub body: Option<String>,
    /// Attachment URL, if any.
    pub attachment: Option<String>,
    /// ISO-8601 creation timestamp.
    pub timestamp: Option<String>,
    /// True if the viewer sent this message.
    pub is_mine: bool,
    /// Read-receipt overlay: another participant has read this message.
    /// The only field that changes after creation.
    pub seen_by_peer: bool,
}

impl ChatMessage {
    /// Builds a view message from its wire form, deriving `is_mine` from
    /// the viewer identity.
    pub fn from_wire(wire: WireMessage, viewer_id: i64) -> Self {
        ChatMessage {
            id: wire.message_id,
            is_mine: wire.sender_id == viewer_id,
            sender_id: wire.sender_id,
            sender_name: wire.sender_name,
            body: wire.message,
            attachment: wire.attachment,
            timestamp: wire.timestamp,
            seen_by_peer: false,
        }
    }
}
