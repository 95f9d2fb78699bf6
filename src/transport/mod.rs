//! Transport Layer
//!
//! The realtime channel abstraction, its production WebSocket
//! implementation and test mock, and the manager that owns the
//! connection state machine and the reconnect/poll deadlines.
//!
//! # Architecture
//!
//! - **RealtimeChannel trait**: platform-agnostic channel I/O
//! - **WebSocketChannel**: tungstenite implementation for production
//! - **MockChannel**: scriptable channel for tests
//! - **TransportManager**: state machine; the sole writer of
//!   [`ConnectionState`]

pub mod channel;
pub mod manager;
pub mod mock;
#[cfg(any(feature = "network-native-tls", feature = "network-rustls"))]
pub mod websocket;

pub use channel::{ChannelConfig, ChannelResult, RealtimeChannel};
pub use manager::{ConnectionState, Inbound, TickOutcome, TransportConfig, TransportManager};
pub use mock::MockChannel;
#[cfg(any(feature = "network-native-tls", feature = "network-rustls"))]
pub use websocket::WebSocketChannel;
