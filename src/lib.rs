//! Roomlink
//!
//! Client core for a chat room with a realtime channel and an automatic
//! polling fallback. The crate owns the connection lifecycle, the
//! idempotent merge of inbound messages across both delivery paths, the
//! outbound send/upload dispatch, and typing/read-receipt signaling.
//! Rendering is left to the embedding UI, which observes [`RoomEvent`]s.
//!
//! # Architecture
//!
//! - **Transport layer**: [`RealtimeChannel`] trait with a tungstenite
//!   implementation and a mock for tests; [`TransportManager`] owns the
//!   [`ConnectionState`] machine and the reconnect/poll deadlines.
//! - **Reconciler**: [`Reconciler`] deduplicates by message id and keeps
//!   the read watermark used to bound poll requests.
//! - **HTTP API**: [`ChatApi`] trait over the poll/send/upload endpoints,
//!   implemented with a blocking reqwest client.
//! - **Client**: [`RoomClient`] ties the pieces together behind a
//!   caller-driven `tick` loop.
//!
//! # Example
//!
//! ```ignore
//! use roomlink::{HttpChatApi, RoomClient, RoomClientConfig, RoomSession, WebSocketChannel};
//! use std::time::Instant;
//!
//! let session = RoomSession::new(7, 1, "csrf-token");
//! let config = RoomClientConfig {
//!     host: "chat.example.com".into(),
//!     secure: true,
//!     ..Default::default()
//! };
//! let api = HttpChatApi::new("https://chat.example.com", &session.csrf_token)?;
//! let mut client = RoomClient::new(session, config, WebSocketChannel::new(), api);
//!
//! client.start(Instant::now());
//! loop {
//!     let now = Instant::now();
//!     client.tick(now);
//!     client.process_incoming(now);
//! }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod events;
pub mod message;
pub mod reconcile;
pub mod session;
pub mod signal;
pub mod transport;

pub use api::{ChatApi, HttpChatApi, MockApi};
pub use client::{RoomClient, RoomClientConfig};
pub use error::{ApiError, ChannelError};
pub use events::{CallbackHandler, EventDispatcher, EventHandler, RoomEvent};
pub use message::{ChatMessage, ClientFrame, ServerEvent, WireMessage};
pub use reconcile::{Applied, Reconciler};
pub use session::RoomSession;
pub use signal::SignalWindow;
pub use transport::{
    ChannelConfig, ConnectionState, MockChannel, RealtimeChannel, TransportConfig,
    TransportManager,
};
#[cfg(any(feature = "network-native-tls", feature = "network-rustls"))]
pub use transport::WebSocketChannel;
