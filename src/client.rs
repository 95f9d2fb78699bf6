// SPDX-FileCopyrightText: 2026 Roomlink Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Room Client
//!
//! Orchestrates one chat room session: the transport manager decides
//! which delivery path is live, the reconciler absorbs inbound messages
//! from either path, and user actions (compose, file pick, typing,
//! visibility) enter here. The embedding UI drives [`RoomClient::tick`]
//! and [`RoomClient::process_incoming`] and renders [`RoomEvent`]s.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::api::ChatApi;
use crate::events::{EventDispatcher, EventHandler, RoomEvent};
use crate::message::{ChatMessage, ClientFrame, ServerEvent, WireMessage};
use crate::reconcile::{Applied, Reconciler};
use crate::session::RoomSession;
use crate::signal::SignalWindow;
use crate::transport::{
    ConnectionState, Inbound, RealtimeChannel, TransportConfig, TransportManager,
};

/// Configuration for a room client.
#[derive(Debug, Clone)]
pub struct RoomClientConfig {
    /// Host of the serving page, e.g. `chat.example.com`.
    pub host: String,
    /// True when the page was served over HTTPS; selects `wss`.
    pub secure: bool,
    /// Transport configuration. The channel URL is derived from the
    /// session when left empty.
    pub transport: TransportConfig,
    /// Outbound typing rate-limit window, milliseconds.
    pub typing_window_ms: u64,
    /// Inbound typing indicator hide delay, milliseconds.
    pub typing_hide_ms: u64,
}

impl Default for RoomClientConfig {
    fn default() -> Self {
        RoomClientConfig {
            host: String::new(),
            secure: false,
            transport: TransportConfig::default(),
            typing_window_ms: 2_000,
            typing_hide_ms: 2_000,
        }
    }
}

/// Client for one chat room.
///
/// Single-threaded and caller-driven: every time-sensitive entry point
/// takes the current instant, and deadlines fire in [`RoomClient::tick`].
pub struct RoomClient<C: RealtimeChannel, A: ChatApi> {
    session: RoomSession,
    manager: TransportManager<C>,
    api: A,
    reconciler: Reconciler,
    typing_out: SignalWindow,
    typing_in: SignalWindow,
    typing_visible: bool,
    events: EventDispatcher,
    last_state: ConnectionState,
}

impl<C: RealtimeChannel, A: ChatApi> RoomClient<C, A> {
    /// Creates a client for the given session.
    pub fn new(session: RoomSession, config: RoomClientConfig, channel: C, api: A) -> Self {
        let mut transport = config.transport.clone();
        if transport.channel.url.is_empty() {
            transport.channel.url = session.channel_url(&config.host, config.secure);
        }

        RoomClient {
            manager: TransportManager::new(channel, transport),
            api,
            reconciler: Reconciler::new(),
            typing_out: SignalWindow::new(Duration::from_millis(config.typing_window_ms)),
            typing_in: SignalWindow::new(Duration::from_millis(config.typing_hide_ms)),
            typing_visible: false,
            events: EventDispatcher::new(),
            last_state: ConnectionState::Disconnected,
            session,
        }
    }

    /// Registers an event handler.
    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.events.add_handler(handler);
    }

    /// The session this client was created for.
    pub fn session(&self) -> &RoomSession {
        &self.session
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.manager.state()
    }

    /// The reconciled message view, in arrival order.
    pub fn messages(&self) -> &[ChatMessage] {
        self.reconciler.messages()
    }

    /// Latest observed message timestamp.
    pub fn watermark(&self) -> Option<&str> {
        self.reconciler.watermark()
    }

    /// True while the typing indicator should be shown.
    pub fn typing_indicator_visible(&self) -> bool {
        self.typing_visible
    }

    /// Returns a reference to the transport manager.
    pub fn manager(&self) -> &TransportManager<C> {
        &self.manager
    }

    /// Returns a mutable reference to the transport manager.
    pub fn manager_mut(&mut self) -> &mut TransportManager<C> {
        &mut self.manager
    }

    /// Returns a mutable reference to the endpoint client.
    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    /// Starts the session: attempts to open the realtime channel, falling
    /// back to polling on failure.
    pub fn start(&mut self, now: Instant) {
        let transitions = self.manager.start(now);
        self.handle_transitions(transitions, now);
    }

    /// Fires due deadlines: reconnect attempts, the degraded-mode poll
    /// cadence, and the typing indicator hide.
    pub fn tick(&mut self, now: Instant) {
        let outcome = self.manager.tick(now);
        self.handle_transitions(outcome.transitions, now);

        if outcome.poll_due {
            self.poll(now);
        }

        if self.typing_visible && !self.typing_in.is_open(now) {
            self.typing_visible = false;
            self.events.dispatch(RoomEvent::TypingStopped);
        }
    }

    /// Drains pending channel events and routes them.
    pub fn process_incoming(&mut self, now: Instant) {
        loop {
            match self.manager.receive(now) {
                Inbound::Event(event) => self.route(event, now),
                Inbound::Idle => break,
                Inbound::ChannelLost => {
                    self.sync_state();
                    break;
                }
            }
        }
    }

    /// Submits one composed message.
    ///
    /// Empty bodies (after trimming) are a silent no-op. While live the
    /// message goes over the channel fire-and-forget and is NOT appended
    /// locally; the server echo renders it through the same inbound path
    /// as received messages. While degraded the send endpoint is used and
    /// the returned message renders immediately. Failed sends are dropped
    /// without user feedback.
    pub fn send_text(&mut self, body: &str, now: Instant) {
        let text = body.trim();
        if text.is_empty() {
            return;
        }

        if self.manager.is_live() {
            let frame = ClientFrame::ChatMessage {
                message: text.to_string(),
            };
            if self.manager.send(&frame, now).is_err() {
                self.sync_state();
            }
        } else {
            match self.api.send_message(self.session.room_id, text) {
                Ok(wire) => self.ingest(wire, now),
                Err(e) => debug!(error = %e, "send fallback failed, dropping message"),
            }
        }

        self.events.dispatch(RoomEvent::ComposerReset);
    }

    /// Uploads one file attachment.
    ///
    /// Always goes over the upload endpoint regardless of connection
    /// state. The caption falls back to the file name when the compose
    /// input is empty. Failed uploads are dropped without user feedback.
    pub fn send_file(&mut self, file_name: &str, data: Vec<u8>, caption: &str, now: Instant) {
        let caption = caption.trim();
        let caption = if caption.is_empty() { file_name } else { caption };

        match self
            .api
            .upload_file(self.session.room_id, file_name, data, caption)
        {
            Ok(wire) => self.ingest(wire, now),
            Err(e) => debug!(error = %e, "upload failed, dropping attachment"),
        }

        self.events.dispatch(RoomEvent::ComposerReset);
    }

    /// Advertises typing state, at most once per rate-limit window and
    /// only while live. Typing presence is best-effort; nothing is sent
    /// while degraded.
    pub fn notify_typing(&mut self, now: Instant) {
        if self.manager.is_live() && self.typing_out.try_fire(now) {
            if self.manager.send(&ClientFrame::Typing, now).is_err() {
                self.sync_state();
            }
        }
    }

    /// Reports a page visibility change; regaining visibility marks the
    /// room as read.
    pub fn visibility_changed(&mut self, visible: bool, now: Instant) {
        if visible {
            self.mark_all_read(now);
        }
    }

    /// Sends a mark-read signal. Only meaningful while live; a no-op
    /// while degraded, since there is no HTTP equivalent.
    pub fn mark_all_read(&mut self, now: Instant) {
        if self.manager.is_live() {
            if self.manager.send(&ClientFrame::MarkRead, now).is_err() {
                self.sync_state();
            }
        }
    }

    /// Runs one degraded-mode poll cycle. Fetch failures are swallowed;
    /// the next cadence retries naturally.
    fn poll(&mut self, now: Instant) {
        let after = self.reconciler.watermark().map(str::to_string);
        match self
            .api
            .fetch_messages(self.session.room_id, after.as_deref())
        {
            Ok(wires) => {
                for wire in wires {
                    self.ingest(wire, now);
                }
            }
            Err(e) => debug!(error = %e, "poll failed, retrying next cycle"),
        }
    }

    /// Routes one inbound channel event.
    fn route(&mut self, event: ServerEvent, now: Instant) {
        match event {
            ServerEvent::ChatMessage(wire) => self.ingest(wire, now),
            ServerEvent::Typing => {
                self.typing_in.touch(now);
                if !self.typing_visible {
                    self.typing_visible = true;
                    self.events.dispatch(RoomEvent::TypingStarted);
                }
            }
            ServerEvent::MessagesRead { reader_id } => {
                // A sender must not consume its own read confirmation
                if reader_id != self.session.viewer_id {
                    self.reconciler.mark_read_by_peer();
                    self.events
                        .dispatch(RoomEvent::ReadReceiptsUpdated { reader_id });
                }
            }
            ServerEvent::Unknown => {
                debug!("dropping unroutable channel event");
            }
        }
    }

    /// Feeds one wire message through the reconciler, dispatching render
    /// events on append and acknowledging messages from other
    /// participants.
    fn ingest(&mut self, wire: WireMessage, now: Instant) {
        let message = ChatMessage::from_wire(wire, self.session.viewer_id);
        match self.reconciler.apply(message.clone()) {
            Applied::Appended {
                cleared_empty_state,
            } => {
                if cleared_empty_state {
                    self.events.dispatch(RoomEvent::EmptyStateCleared);
                }
                let from_other = !message.is_mine;
                self.events.dispatch(RoomEvent::MessageAppended { message });
                if from_other {
                    self.mark_all_read(now);
                }
            }
            Applied::Duplicate => {}
        }
    }

    /// Applies manager state transitions: dispatches change events and
    /// triggers the mark-read signal on every entry into `Live`.
    fn handle_transitions(&mut self, transitions: Vec<ConnectionState>, now: Instant) {
        for state in transitions {
            if state != self.last_state {
                self.last_state = state;
                self.events
                    .dispatch(RoomEvent::ConnectionStateChanged { state });
            }
            if state == ConnectionState::Live {
                // Opening implies the viewer is present with the full
                // server-rendered history in view
                self.mark_all_read(now);
            }
        }
    }

    /// Dispatches a state-change event if the manager moved underneath us
    /// (channel loss during send/receive).
    fn sync_state(&mut self) {
        let state = self.manager.state();
        if state != self.last_state {
            self.last_state = state;
            self.events
                .dispatch(RoomEvent::ConnectionStateChanged { state });
        }
    }
}
