//! Tests for the transport manager state machine: degrade on failure,
//! fixed-delay reconnection, and the poll cadence.

use std::time::{Duration, Instant};

use roomlink::message::{ClientFrame, ServerEvent};
use roomlink::transport::{
    ConnectionState, Inbound, MockChannel, RealtimeChannel, TransportConfig, TransportManager,
};

fn manager(channel: MockChannel) -> TransportManager<MockChannel> {
    TransportManager::new(channel, TransportConfig::default())
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn test_start_success_goes_live() {
    let mut mgr = manager(MockChannel::new());
    let t0 = Instant::now();

    let transitions = mgr.start(t0);
    assert_eq!(
        transitions,
        vec![ConnectionState::Connecting, ConnectionState::Live]
    );
    assert!(mgr.is_live());
}

#[test]
fn test_start_failure_degrades() {
    let mut channel = MockChannel::new();
    channel.fail_next_connects(1);
    let mut mgr = manager(channel);
    let t0 = Instant::now();

    let transitions = mgr.start(t0);
    assert_eq!(
        transitions,
        vec![ConnectionState::Connecting, ConnectionState::Degraded]
    );
    assert_eq!(mgr.state(), ConnectionState::Degraded);
}

#[test]
fn test_poll_cadence_while_degraded() {
    let mut channel = MockChannel::new();
    channel.fail_next_connects(100);
    let mut mgr = manager(channel);
    let t0 = Instant::now();
    mgr.start(t0);

    // Nothing due before the first interval
    assert!(!mgr.tick(t0 + ms(2_999)).poll_due);

    // Due on the cadence
    assert!(mgr.tick(t0 + ms(3_000)).poll_due);
    assert!(!mgr.tick(t0 + ms(3_001)).poll_due);
    assert!(mgr.tick(t0 + ms(6_000)).poll_due);
}

#[test]
fn test_reconnect_scheduled_and_fires_once() {
    let mut channel = MockChannel::new();
    channel.fail_next_connects(1);
    let mut mgr = manager(channel);
    let t0 = Instant::now();
    mgr.start(t0);
    assert_eq!(mgr.channel().connect_attempts(), 1);

    // Before the delay, no attempt
    mgr.tick(t0 + ms(2_999));
    assert_eq!(mgr.channel().connect_attempts(), 1);

    // The scheduled retry fires exactly once
    let outcome = mgr.tick(t0 + ms(3_000));
    assert_eq!(mgr.channel().connect_attempts(), 2);
    assert_eq!(
        outcome.transitions,
        vec![ConnectionState::Connecting, ConnectionState::Live]
    );

    // No further attempts once live
    mgr.tick(t0 + ms(10_000));
    assert_eq!(mgr.channel().connect_attempts(), 2);
}

#[test]
fn test_reconnection_is_indefinite() {
    let mut channel = MockChannel::new();
    channel.fail_next_connects(5);
    let mut mgr = manager(channel);
    let t0 = Instant::now();
    mgr.start(t0);

    // Every failed attempt schedules the next one at a fixed delay
    for i in 1..=4u64 {
        mgr.tick(t0 + ms(3_000 * i));
    }
    assert_eq!(mgr.channel().connect_attempts(), 5);
    assert_eq!(mgr.state(), ConnectionState::Degraded);

    // The fifth retry succeeds
    mgr.tick(t0 + ms(15_000));
    assert!(mgr.is_live());
    assert_eq!(mgr.channel().connect_attempts(), 6);
}

#[test]
fn test_going_live_stops_polling() {
    let mut channel = MockChannel::new();
    channel.fail_next_connects(2);
    let mut mgr = manager(channel);
    let t0 = Instant::now();
    mgr.start(t0);

    // First retry fails and the poll fires; the second retry succeeds
    // and must cancel the pending poll within the same transition
    assert!(mgr.tick(t0 + ms(3_000)).poll_due);
    assert!(!mgr.tick(t0 + ms(6_000)).poll_due);
    assert!(mgr.is_live());

    // No polling while live, however long we wait
    for i in 3..20u64 {
        assert!(!mgr.tick(t0 + ms(3_000 * i)).poll_due);
    }
}

#[test]
fn test_receive_loss_degrades() {
    let mut mgr = manager(MockChannel::new());
    let t0 = Instant::now();
    mgr.start(t0);

    mgr.channel_mut().break_connection();
    match mgr.receive(t0 + ms(100)) {
        Inbound::ChannelLost => {}
        other => panic!("expected ChannelLost, got {:?}", other),
    }
    assert_eq!(mgr.state(), ConnectionState::Degraded);
    // The errored channel is force-closed before the transition
    assert!(!mgr.channel().is_open());
}

#[test]
fn test_send_loss_degrades() {
    let mut mgr = manager(MockChannel::new());
    let t0 = Instant::now();
    mgr.start(t0);

    mgr.channel_mut().break_connection();
    let result = mgr.send(&ClientFrame::Typing, t0 + ms(100));
    assert!(result.is_err());
    assert_eq!(mgr.state(), ConnectionState::Degraded);
}

#[test]
fn test_send_requires_live_channel() {
    let mut channel = MockChannel::new();
    channel.fail_next_connects(1);
    let mut mgr = manager(channel);
    mgr.start(Instant::now());

    let result = mgr.send(&ClientFrame::Typing, Instant::now());
    assert!(result.is_err());
    assert!(mgr.channel().sent_frames().is_empty());
}

#[test]
fn test_receive_delivers_queued_events() {
    let mut channel = MockChannel::new();
    channel.queue_event(ServerEvent::Typing);
    let mut mgr = manager(channel);
    let t0 = Instant::now();
    mgr.start(t0);

    match mgr.receive(t0) {
        Inbound::Event(ServerEvent::Typing) => {}
        other => panic!("expected typing event, got {:?}", other),
    }
    match mgr.receive(t0) {
        Inbound::Idle => {}
        other => panic!("expected idle, got {:?}", other),
    }
}

#[test]
fn test_receive_while_degraded_is_idle() {
    let mut channel = MockChannel::new();
    channel.fail_next_connects(1);
    let mut mgr = manager(channel);
    let t0 = Instant::now();
    mgr.start(t0);

    match mgr.receive(t0) {
        Inbound::Idle => {}
        other => panic!("expected idle while degraded, got {:?}", other),
    }
}
