//! HTTP Endpoints
//!
//! The degraded-mode delivery path: polling for new messages, the
//! synchronous send fallback, and file upload (which always goes over
//! HTTP; attachments are not modeled on the realtime channel).

pub mod http;
pub mod mock;

pub use http::HttpChatApi;
pub use mock::{ApiCall, MockApi};

use crate::error::ApiError;
use crate::message::WireMessage;

/// Result type for endpoint operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// The chat room's HTTP endpoints.
///
/// Implemented by [`HttpChatApi`] in production and [`MockApi`] in
/// tests. All methods are blocking; callers treat failures per the
/// degraded-delivery policy (poll failures are swallowed and retried on
/// the next cadence, send/upload rejections drop the message silently).
pub trait ChatApi {
    /// Fetches messages with a timestamp strictly after `after`, or the
    /// most recent messages when no watermark is known yet.
    fn fetch_messages(&mut self, room_id: i64, after: Option<&str>)
        -> ApiResult<Vec<WireMessage>>;

    /// Submits one composed message; returns the stored representation.
    fn send_message(&mut self, room_id: i64, body: &str) -> ApiResult<WireMessage>;

    /// Uploads one file with an optional caption; returns the stored
    /// message carrying the attachment URL.
    fn upload_file(
        &mut self,
        room_id: i64,
        file_name: &str,
        data: Vec<u8>,
        caption: &str,
    ) -> ApiResult<WireMessage>;
}
