//! Mock Channel
//!
//! Scriptable in-memory channel for tests: queue inbound events, record
//! outbound frames, and script connect failures or a mid-session drop.

use std::collections::VecDeque;

use super::channel::{ChannelConfig, ChannelResult, RealtimeChannel};
use crate::error::ChannelError;
use crate::message::{ClientFrame, ServerEvent};

/// Mock channel for testing.
#[derive(Default)]
pub struct MockChannel {
    open: bool,
    inbox: VecDeque<ServerEvent>,
    sent: Vec<ClientFrame>,
    /// Number of upcoming `connect` calls that must fail.
    failing_connects: u32,
    /// When set, the next `receive` reports the channel as lost.
    dropped: bool,
    connect_attempts: u32,
}

impl MockChannel {
    /// Creates a new, closed mock channel.
    pub fn new() -> Self {
        MockChannel::default()
    }

    /// Queues an inbound event for delivery via `receive`.
    pub fn queue_event(&mut self, event: ServerEvent) {
        self.inbox.push_back(event);
    }

    /// All frames sent through this channel, in order.
    pub fn sent_frames(&self) -> &[ClientFrame] {
        &self.sent
    }

    /// Scripts the next `count` connect attempts to fail.
    pub fn fail_next_connects(&mut self, count: u32) {
        self.failing_connects = count;
    }

    /// Scripts a connection loss: the next `receive` fails with `Closed`.
    pub fn break_connection(&mut self) {
        self.dropped = true;
    }

    /// Total `connect` calls observed, successful or not.
    pub fn connect_attempts(&self) -> u32 {
        self.connect_attempts
    }
}

impl RealtimeChannel for MockChannel {
    fn connect(&mut self, _config: &ChannelConfig) -> ChannelResult<()> {
        self.connect_attempts += 1;
        if self.failing_connects > 0 {
            self.failing_connects -= 1;
            return Err(ChannelError::ConnectionFailed("scripted failure".into()));
        }
        self.open = true;
        self.dropped = false;
        Ok(())
    }

    fn disconnect(&mut self) -> ChannelResult<()> {
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn send(&mut self, frame: &ClientFrame) -> ChannelResult<()> {
        if !self.open {
            return Err(ChannelError::NotConnected);
        }
        if self.dropped {
            self.open = false;
            return Err(ChannelError::Closed);
        }
        self.sent.push(frame.clone());
        Ok(())
    }

    fn receive(&mut self) -> ChannelResult<Option<ServerEvent>> {
        if !self.open {
            return Err(ChannelError::NotConnected);
        }
        if self.dropped {
            self.open = false;
            return Err(ChannelError::Closed);
        }
        Ok(self.inbox.pop_front())
    }
}
