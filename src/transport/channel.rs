//! Realtime Channel Trait
//!
//! Platform-agnostic abstraction for the persistent bidirectional
//! connection. The manager drives implementations through a synchronous
//! interface; "no message yet" is `Ok(None)`, so a short read timeout
//! keeps the caller's tick loop responsive.

use crate::error::ChannelError;
use crate::message::{ClientFrame, ServerEvent};

/// Result type for channel operations.
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Configuration for channel connections.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Channel URL (`ws://` or `wss://`).
    pub url: String,
    /// Connection timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds. Short on purpose: `receive` is
    /// called from the tick loop and must not stall it.
    pub io_timeout_ms: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        ChannelConfig {
            url: String::new(),
            connect_timeout_ms: 10_000,
            io_timeout_ms: 250,
        }
    }
}

/// Realtime channel for chat event delivery.
///
/// Abstracts the underlying connection (WebSocket in production, a mock
/// in tests). The [`TransportManager`](super::TransportManager) is the
/// only caller; it owns the connection state machine, implementations
/// only report per-operation failure.
pub trait RealtimeChannel: Send {
    /// Opens the channel.
    fn connect(&mut self, config: &ChannelConfig) -> ChannelResult<()>;

    /// Closes the channel. Safe to call when already closed.
    fn disconnect(&mut self) -> ChannelResult<()>;

    /// Returns true while the channel is open.
    fn is_open(&self) -> bool;

    /// Sends one frame. Errors if the channel is closed or broken.
    fn send(&mut self, frame: &ClientFrame) -> ChannelResult<()>;

    /// Receives the next event, `Ok(None)` if none arrived within the
    /// read timeout.
    fn receive(&mut self) -> ChannelResult<Option<ServerEvent>>;
}
