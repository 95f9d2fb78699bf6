// SPDX-FileCopyrightText: 2026 Roomlink Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error Types
//!
//! Per-layer errors for the realtime channel and the HTTP API. Client
//! operations themselves are infallible by design: every failure mode
//! degrades to "try again later" or "silently drop".

use thiserror::Error;

/// Errors from the realtime channel.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Could not open the channel.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Operation requires an open channel.
    #[error("not connected")]
    NotConnected,

    /// The peer closed the channel.
    #[error("connection closed")]
    Closed,

    /// A frame could not be sent.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// A frame could not be received.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Errors from the HTTP endpoints (poll, send, upload).
#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-success HTTP status.
    #[error("http error: {0}")]
    Http(u16),

    /// Network-level request failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with an `{error}` payload.
    #[error("rejected: {0}")]
    Rejected(String),

    /// Response body could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
