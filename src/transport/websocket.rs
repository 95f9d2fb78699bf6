// SPDX-FileCopyrightText: 2026 Roomlink Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! WebSocket Channel
//!
//! Real channel implementation using tungstenite. Supports both
//! native-tls and rustls TLS backends, selected via cargo features.
//! Frames are JSON text, matching the server's consumer protocol.

use std::net::TcpStream;
use std::time::Duration;

#[cfg(all(feature = "network-native-tls", not(feature = "network-rustls")))]
use native_tls::TlsConnector;

#[cfg(feature = "network-rustls")]
use rustls::pki_types::ServerName;
#[cfg(feature = "network-rustls")]
use std::sync::Arc;

use tracing::{debug, warn};
use tungstenite::client::IntoClientRequest;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

use super::channel::{ChannelConfig, ChannelResult, RealtimeChannel};
use crate::error::ChannelError;
use crate::message::{ClientFrame, ServerEvent};

/// WebSocket channel for chat event delivery.
///
/// Supports both ws:// (plaintext) and wss:// (TLS) connections.
///
/// # Example
///
/// ```ignore
/// use roomlink::{ChannelConfig, RealtimeChannel, WebSocketChannel};
///
/// let mut channel = WebSocketChannel::new();
/// let config = ChannelConfig {
///     url: "wss://chat.example.com/ws/chat/7/".to_string(),
///     ..Default::default()
/// };
/// channel.connect(&config)?;
/// ```
pub struct WebSocketChannel {
    socket: Option<WebSocket<MaybeTlsStream<TcpStream>>>,
}

impl WebSocketChannel {
    /// Creates a new, closed WebSocket channel.
    pub fn new() -> Self {
        WebSocketChannel { socket: None }
    }

    /// Parses a channel URL into host, port and TLS flag.
    fn parse_url(url: &str) -> Result<(String, u16, bool), ChannelError> {
        let is_tls = url.starts_with("wss://");
        let url_without_scheme = url
            .strip_prefix("wss://")
            .or_else(|| url.strip_prefix("ws://"))
            .ok_or_else(|| {
                ChannelError::ConnectionFailed(
                    "invalid URL scheme (expected ws:// or wss://)".into(),
                )
            })?;

        let host_port = url_without_scheme
            .split('/')
            .next()
            .unwrap_or(url_without_scheme);

        let (host, port) = if let Some(colon_pos) = host_port.rfind(':') {
            let host = &host_port[..colon_pos];
            let port_str = &host_port[colon_pos + 1..];
            let port: u16 = port_str.parse().map_err(|_| {
                ChannelError::ConnectionFailed(format!("invalid port: {}", port_str))
            })?;
            (host.to_string(), port)
        } else {
            let default_port = if is_tls { 443 } else { 80 };
            (host_port.to_string(), default_port)
        };

        Ok((host, port, is_tls))
    }

    /// Create a TLS stream using native-tls
    #[cfg(all(feature = "network-native-tls", not(feature = "network-rustls")))]
    fn create_tls_stream(
        host: &str,
        tcp_stream: TcpStream,
    ) -> Result<MaybeTlsStream<TcpStream>, ChannelError> {
        let connector = TlsConnector::new()
            .map_err(|e| ChannelError::ConnectionFailed(format!("TLS error: {}", e)))?;
        let tls_stream = connector
            .connect(host, tcp_stream)
            .map_err(|e| ChannelError::ConnectionFailed(format!("TLS handshake failed: {}", e)))?;
        Ok(MaybeTlsStream::NativeTls(tls_stream))
    }

    /// Create a TLS stream using rustls
    #[cfg(feature = "network-rustls")]
    fn create_tls_stream(
        host: &str,
        tcp_stream: TcpStream,
    ) -> Result<MaybeTlsStream<TcpStream>, ChannelError> {
        let mut root_store = rustls::RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let server_name: ServerName<'_> = host
            .try_into()
            .map_err(|_| ChannelError::ConnectionFailed(format!("invalid server name: {}", host)))?;

        let tls_conn = rustls::ClientConnection::new(Arc::new(config), server_name.to_owned())
            .map_err(|e| ChannelError::ConnectionFailed(format!("TLS setup failed: {}", e)))?;

        let tls_stream = rustls::StreamOwned::new(tls_conn, tcp_stream);
        Ok(MaybeTlsStream::Rustls(tls_stream))
    }
}

impl Default for WebSocketChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl RealtimeChannel for WebSocketChannel {
    fn connect(&mut self, config: &ChannelConfig) -> ChannelResult<()> {
        if self.socket.is_some() {
            return Ok(());
        }

        let (host, port, is_tls) = Self::parse_url(&config.url)?;
        let addr = format!("{}:{}", host, port);

        let tcp_stream = TcpStream::connect(&addr)
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;

        tcp_stream
            .set_read_timeout(Some(Duration::from_millis(config.io_timeout_ms)))
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;
        tcp_stream
            .set_write_timeout(Some(Duration::from_millis(config.connect_timeout_ms)))
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;

        let stream: MaybeTlsStream<TcpStream> = if is_tls {
            Self::create_tls_stream(&host, tcp_stream)?
        } else {
            MaybeTlsStream::Plain(tcp_stream)
        };

        // WebSocket handshake - use IntoClientRequest for a proper
        // HTTP/1.1 upgrade request
        let request = config.url.as_str().into_client_request().map_err(|e| {
            ChannelError::ConnectionFailed(format!("invalid WebSocket request: {}", e))
        })?;

        let (socket, _response) = tungstenite::client(request, stream).map_err(|e| {
            ChannelError::ConnectionFailed(format!("WebSocket handshake failed: {}", e))
        })?;

        debug!(url = %config.url, "channel open");
        self.socket = Some(socket);
        Ok(())
    }

    fn disconnect(&mut self) -> ChannelResult<()> {
        if let Some(mut socket) = self.socket.take() {
            let _ = socket.close(None); // Ignore errors on close
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.socket.is_some()
    }

    fn send(&mut self, frame: &ClientFrame) -> ChannelResult<()> {
        let socket = self.socket.as_mut().ok_or(ChannelError::NotConnected)?;

        let encoded = serde_json::to_string(frame)
            .map_err(|e| ChannelError::SendFailed(e.to_string()))?;

        if let Err(e) = socket.send(Message::Text(encoded)) {
            return if matches!(
                e,
                tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed
            ) {
                self.socket = None;
                Err(ChannelError::Closed)
            } else {
                Err(ChannelError::SendFailed(e.to_string()))
            };
        }

        socket
            .flush()
            .map_err(|e| ChannelError::SendFailed(format!("flush failed: {}", e)))?;

        Ok(())
    }

    fn receive(&mut self) -> ChannelResult<Option<ServerEvent>> {
        let socket = self.socket.as_mut().ok_or(ChannelError::NotConnected)?;

        match socket.read() {
            Ok(Message::Text(data)) => match serde_json::from_str::<ServerEvent>(&data) {
                Ok(event) => Ok(Some(event)),
                Err(e) => {
                    // Malformed payloads are dropped, never fatal
                    warn!(error = %e, "dropping malformed channel payload");
                    Ok(None)
                }
            },
            Ok(Message::Ping(data)) => {
                let _ = socket.send(Message::Pong(data));
                Ok(None)
            }
            Ok(Message::Pong(_)) => Ok(None),
            Ok(Message::Close(_)) => {
                self.socket = None;
                Err(ChannelError::Closed)
            }
            Ok(Message::Binary(_)) => {
                // The chat protocol is text-only
                Ok(None)
            }
            Ok(Message::Frame(_)) => Ok(None),
            Err(tungstenite::Error::Io(ref e))
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                // No message within the read timeout
                Ok(None)
            }
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                self.socket = None;
                Err(ChannelError::Closed)
            }
            Err(e) => Err(ChannelError::ReceiveFailed(e.to_string())),
        }
    }
}
