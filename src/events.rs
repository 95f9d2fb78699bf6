//! Event System
//!
//! Callbacks for room events. The embedding UI registers handlers and
//! performs the actual rendering; the client core never touches markup.

use std::sync::Arc;

use crate::message::ChatMessage;
use crate::transport::ConnectionState;

/// Events emitted by the room client.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    /// The connection state changed.
    ConnectionStateChanged {
        /// The new connection state.
        state: ConnectionState,
    },

    /// The first message was appended; remove the empty-room placeholder.
    EmptyStateCleared,

    /// A message passed the reconciler and should be rendered.
    MessageAppended {
        /// The appended message.
        message: ChatMessage,
    },

    /// Another participant started typing.
    TypingStarted,

    /// The typing indicator window lapsed.
    TypingStopped,

    /// Another participant read the room; refresh receipt markers on the
    /// viewer's own messages.
    ReadReceiptsUpdated {
        /// Identity of the reading participant.
        reader_id: i64,
    },

    /// A send path was invoked; clear the compose input and reset its
    /// auto-grow sizing.
    ComposerReset,
}

/// Event handler trait.
///
/// Implement this trait to receive room events.
pub trait EventHandler: Send + Sync {
    /// Called when an event occurs.
    fn on_event(&self, event: RoomEvent);
}

/// Simple callback-based event handler.
///
/// Wraps a closure for easy event handling.
pub struct CallbackHandler<F>
where
    F: Fn(RoomEvent) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackHandler<F>
where
    F: Fn(RoomEvent) + Send + Sync,
{
    /// Creates a new callback handler.
    pub fn new(callback: F) -> Self {
        CallbackHandler { callback }
    }
}

impl<F> EventHandler for CallbackHandler<F>
where
    F: Fn(RoomEvent) + Send + Sync,
{
    fn on_event(&self, event: RoomEvent) {
        (self.callback)(event);
    }
}

/// Event dispatcher for managing multiple handlers.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    /// Creates a new event dispatcher.
    pub fn new() -> Self {
        EventDispatcher {
            handlers: Vec::new(),
        }
    }

    /// Adds an event handler.
    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    /// Removes all handlers.
    pub fn clear_handlers(&mut self) {
        self.handlers.clear();
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Dispatches an event to all handlers.
    pub fn dispatch(&self, event: RoomEvent) {
        for handler in &self.handlers {
            handler.on_event(event.clone());
        }
    }
}
