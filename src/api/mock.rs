//! Mock Endpoint Client
//!
//! Scriptable in-memory API for tests: queue poll/send/upload outcomes
//! and inspect the calls the client made.

use std::collections::VecDeque;

use super::{ApiResult, ChatApi};
use crate::error::ApiError;
use crate::message::WireMessage;

/// A recorded endpoint call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    /// `fetch_messages(room_id, after)`.
    Fetch {
        room_id: i64,
        after: Option<String>,
    },
    /// `send_message(room_id, body)`.
    Send { room_id: i64, body: String },
    /// `upload_file(room_id, file_name, caption)`.
    Upload {
        room_id: i64,
        file_name: String,
        caption: String,
    },
}

/// Mock API for testing.
#[derive(Default)]
pub struct MockApi {
    poll_queue: VecDeque<ApiResult<Vec<WireMessage>>>,
    send_queue: VecDeque<ApiResult<WireMessage>>,
    upload_queue: VecDeque<ApiResult<WireMessage>>,
    calls: Vec<ApiCall>,
}

impl MockApi {
    /// Creates a mock with no scripted responses.
    pub fn new() -> Self {
        MockApi::default()
    }

    /// Scripts the next poll response.
    pub fn queue_poll(&mut self, result: ApiResult<Vec<WireMessage>>) {
        self.poll_queue.push_back(result);
    }

    /// Scripts the next send response.
    pub fn queue_send(&mut self, result: ApiResult<WireMessage>) {
        self.send_queue.push_back(result);
    }

    /// Scripts the next upload response.
    pub fn queue_upload(&mut self, result: ApiResult<WireMessage>) {
        self.upload_queue.push_back(result);
    }

    /// All calls observed, in order.
    pub fn calls(&self) -> &[ApiCall] {
        &self.calls
    }
}

impl ChatApi for MockApi {
    fn fetch_messages(
        &mut self,
        room_id: i64,
        after: Option<&str>,
    ) -> ApiResult<Vec<WireMessage>> {
        self.calls.push(ApiCall::Fetch {
            room_id,
            after: after.map(str::to_string),
        });
        self.poll_queue
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn send_message(&mut self, room_id: i64, body: &str) -> ApiResult<WireMessage> {
        self.calls.push(ApiCall::Send {
            room_id,
            body: body.to_string(),
        });
        self.send_queue
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Rejected("unscripted send".into())))
    }

    fn upload_file(
        &mut self,
        room_id: i64,
        file_name: &str,
        _data: Vec<u8>,
        caption: &str,
    ) -> ApiResult<WireMessage> {
        self.calls.push(ApiCall::Upload {
            room_id,
            file_name: file_name.to_string(),
            caption: caption.to_string(),
        });
        self.upload_queue
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Rejected("unscripted upload".into())))
    }
}
