// SPDX-FileCopyrightText: 2026 Roomlink Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Transport Manager
//!
//! Owns the connection lifecycle: exactly one delivery path is
//! authoritative at any time. The realtime channel is preferred; on any
//! closure delivery degrades to polling while a reconnect attempt is
//! scheduled. Reconnection is unconditional and indefinite with a fixed
//! delay. Nobody else mutates [`ConnectionState`].
//!
//! The manager never sleeps. Deadlines are stored and fired by
//! [`TransportManager::tick`], which the embedding loop drives with the
//! current instant.

use std::time::{Duration, Instant};

use tracing::debug;

use super::channel::{ChannelConfig, RealtimeChannel};
use crate::error::ChannelError;
use crate::message::{ClientFrame, ServerEvent};

/// Connection state. Single source of truth for which delivery path is
/// authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Session not started.
    Disconnected,
    /// Channel open in progress. Transient: resolves to `Live` or
    /// `Degraded` within the same call.
    Connecting,
    /// Realtime channel open and accepting traffic.
    Live,
    /// Channel unavailable; polling carries delivery until a reconnect
    /// succeeds.
    Degraded,
}

/// Configuration for the transport manager.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Channel configuration (URL, timeouts).
    pub channel: ChannelConfig,
    /// Delay before a reconnect attempt after any closure, milliseconds.
    pub reconnect_delay_ms: u64,
    /// Poll cadence while degraded, milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            channel: ChannelConfig::default(),
            reconnect_delay_ms: 3_000,
            poll_interval_ms: 3_000,
        }
    }
}

/// What a tick produced.
#[derive(Debug, Default)]
pub struct TickOutcome {
    /// States entered during this tick, in order.
    pub transitions: Vec<ConnectionState>,
    /// A degraded-mode poll is due; the caller should fetch and feed the
    /// reconciler.
    pub poll_due: bool,
}

/// One step of draining the channel.
#[derive(Debug)]
pub enum Inbound {
    /// An event arrived.
    Event(ServerEvent),
    /// Nothing pending right now.
    Idle,
    /// The channel broke while reading; the manager has already degraded.
    ChannelLost,
}

/// Manages which delivery path is live and transitions between them
/// without message loss.
pub struct TransportManager<C: RealtimeChannel> {
    channel: C,
    config: TransportConfig,
    state: ConnectionState,
    /// At most one pending reconnect attempt; any new closure replaces it.
    reconnect_at: Option<Instant>,
    /// Next degraded-mode poll. `None` whenever the channel is live.
    next_poll_at: Option<Instant>,
}

impl<C: RealtimeChannel> TransportManager<C> {
    /// Creates a manager around an unopened channel.
    pub fn new(channel: C, config: TransportConfig) -> Self {
        TransportManager {
            channel,
            config,
            state: ConnectionState::Disconnected,
            reconnect_at: None,
            next_poll_at: None,
        }
    }

    /// Returns the current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns true while the realtime channel is authoritative.
    pub fn is_live(&self) -> bool {
        self.state == ConnectionState::Live
    }

    /// Starts the session: enters `Connecting` and attempts to open the
    /// channel. Returns the states entered, in order.
    pub fn start(&mut self, now: Instant) -> Vec<ConnectionState> {
        let mut transitions = vec![ConnectionState::Connecting];
        self.state = ConnectionState::Connecting;

        match self.channel.connect(&self.config.channel) {
            Ok(()) => {
                self.on_open();
                transitions.push(ConnectionState::Live);
            }
            Err(e) => {
                debug!(error = %e, "channel open failed, degrading");
                self.degrade(now);
                transitions.push(ConnectionState::Degraded);
            }
        }
        transitions
    }

    /// Fires due deadlines: a pending reconnect attempt, then the poll
    /// cadence while degraded.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if self.reconnect_at.map_or(false, |at| now >= at) {
            self.reconnect_at = None;
            self.state = ConnectionState::Connecting;
            outcome.transitions.push(ConnectionState::Connecting);

            match self.channel.connect(&self.config.channel) {
                Ok(()) => {
                    debug!("channel reopened");
                    self.on_open();
                    outcome.transitions.push(ConnectionState::Live);
                }
                Err(e) => {
                    debug!(error = %e, "reconnect failed");
                    self.degrade(now);
                    outcome.transitions.push(ConnectionState::Degraded);
                }
            }
        }

        if self.state == ConnectionState::Degraded {
            if let Some(at) = self.next_poll_at {
                if now >= at {
                    self.next_poll_at = Some(at + self.poll_interval());
                    outcome.poll_due = true;
                }
            }
        }

        outcome
    }

    /// Sends one frame over the realtime channel.
    ///
    /// Errors when the channel is not authoritative. A send failure is a
    /// channel loss: the channel is force-closed and the manager degrades
    /// before the error is returned.
    pub fn send(&mut self, frame: &ClientFrame, now: Instant) -> Result<(), ChannelError> {
        if self.state != ConnectionState::Live {
            return Err(ChannelError::NotConnected);
        }
        match self.channel.send(frame) {
            Ok(()) => Ok(()),
            Err(e) => {
                debug!(error = %e, "send failed, degrading");
                let _ = self.channel.disconnect();
                self.degrade(now);
                Err(e)
            }
        }
    }

    /// Receives the next channel event.
    ///
    /// On a read failure the channel is force-closed first, then the
    /// manager degrades.
    pub fn receive(&mut self, now: Instant) -> Inbound {
        if self.state != ConnectionState::Live {
            return Inbound::Idle;
        }
        match self.channel.receive() {
            Ok(Some(event)) => Inbound::Event(event),
            Ok(None) => Inbound::Idle,
            Err(e) => {
                debug!(error = %e, "channel lost, degrading");
                let _ = self.channel.disconnect();
                self.degrade(now);
                Inbound::ChannelLost
            }
        }
    }

    /// Returns a reference to the underlying channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Returns a mutable reference to the underlying channel.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    fn on_open(&mut self) {
        self.state = ConnectionState::Live;
        // Exactly one authoritative transport: going live stops polling
        // and cancels any pending reconnect
        self.next_poll_at = None;
        self.reconnect_at = None;
    }

    fn degrade(&mut self, now: Instant) {
        self.state = ConnectionState::Degraded;
        if self.next_poll_at.is_none() {
            self.next_poll_at = Some(now + self.poll_interval());
        }
        // Replaces any earlier deadline: at most one pending reconnect
        self.reconnect_at = Some(now + Duration::from_millis(self.config.reconnect_delay_ms));
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.config.poll_interval_ms)
    }
}

// INLINE_TEST_REQUIRED: Tests private reconnect_at/next_poll_at deadlines
#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockChannel;

    fn test_config() -> TransportConfig {
        TransportConfig::default()
    }

    fn manager(channel: MockChannel) -> TransportManager<MockChannel> {
        TransportManager::new(channel, test_config())
    }

    #[test]
    fn test_open_clears_both_deadlines() {
        let mut channel = MockChannel::new();
        channel.fail_next_connects(1);
        let mut mgr = manager(channel);

        let t0 = Instant::now();
        mgr.start(t0);
        assert!(mgr.reconnect_at.is_some());
        assert!(mgr.next_poll_at.is_some());

        mgr.tick(t0 + Duration::from_millis(3_000));
        assert_eq!(mgr.state(), ConnectionState::Live);
        assert!(mgr.reconnect_at.is_none());
        assert!(mgr.next_poll_at.is_none());
    }

    #[test]
    fn test_degrade_keeps_existing_poll_deadline() {
        let mut channel = MockChannel::new();
        channel.fail_next_connects(2);
        let mut config = test_config();
        config.reconnect_delay_ms = 1_000;
        let mut mgr = TransportManager::new(channel, config);

        let t0 = Instant::now();
        mgr.start(t0);
        let first_poll = mgr.next_poll_at;
        assert_eq!(first_poll, Some(t0 + Duration::from_millis(3_000)));

        // Failed retry replaces the reconnect deadline but must not
        // reset the poll cadence
        mgr.tick(t0 + Duration::from_millis(1_000));
        assert_eq!(mgr.next_poll_at, first_poll);
        assert_eq!(
            mgr.reconnect_at,
            Some(t0 + Duration::from_millis(2_000))
        );
    }

    #[test]
    fn test_at_most_one_pending_reconnect() {
        let channel = MockChannel::new();
        let mut mgr = manager(channel);

        let t0 = Instant::now();
        mgr.start(t0);
        assert_eq!(mgr.state(), ConnectionState::Live);

        // Two consecutive losses: the second replaces the first deadline
        mgr.channel_mut().break_connection();
        let _ = mgr.receive(t0 + Duration::from_millis(100));
        let first = mgr.reconnect_at;

        mgr.degrade(t0 + Duration::from_millis(200));
        assert_ne!(mgr.reconnect_at, first);
        assert_eq!(
            mgr.reconnect_at,
            Some(t0 + Duration::from_millis(3_200))
        );
    }
}
