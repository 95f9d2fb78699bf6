// SPDX-FileCopyrightText: 2026 Roomlink Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP Endpoint Client
//!
//! Blocking reqwest client for the chat endpoints. The anti-forgery
//! token travels in the `X-CSRFToken` header on mutating requests; the
//! poll endpoint is marked as an AJAX request the way the server expects.

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use tracing::warn;

use super::{ApiResult, ChatApi};
use crate::error::ApiError;
use crate::message::{ApiReply, PollResponse, WireMessage};

/// Client for the chat room's HTTP endpoints.
pub struct HttpChatApi {
    client: Client,
    base_url: String,
    csrf_token: String,
}

impl HttpChatApi {
    /// Creates a client against the given origin, e.g.
    /// `https://chat.example.com`.
    pub fn new(base_url: &str, csrf_token: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(format!(
                "Roomlink/{}",
                option_env!("CARGO_PKG_VERSION").unwrap_or("0.1.0")
            ))
            .build()?;

        Ok(HttpChatApi {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            csrf_token: csrf_token.to_string(),
        })
    }

    /// The configured origin.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Unwraps a send/upload reply, turning `{error}` payloads into
    /// [`ApiError::Rejected`].
    fn into_message(reply: ApiReply) -> ApiResult<WireMessage> {
        match reply {
            ApiReply::Message(message) => Ok(message),
            ApiReply::Rejected { error } => {
                warn!(error = %error, "server rejected send");
                Err(ApiError::Rejected(error))
            }
        }
    }
}

impl ChatApi for HttpChatApi {
    fn fetch_messages(
        &mut self,
        room_id: i64,
        after: Option<&str>,
    ) -> ApiResult<Vec<WireMessage>> {
        let url = format!("{}/chat/api/messages/{}/", self.base_url, room_id);
        let mut request = self
            .client
            .get(&url)
            .header("X-Requested-With", "XMLHttpRequest");
        if let Some(after) = after {
            request = request.query(&[("after", after)]);
        }

        let response = request.send()?;
        if !response.status().is_success() {
            return Err(ApiError::Http(response.status().as_u16()));
        }

        let body: PollResponse = response.json()?;
        Ok(body.messages)
    }

    fn send_message(&mut self, room_id: i64, body: &str) -> ApiResult<WireMessage> {
        let url = format!("{}/chat/api/send/{}/", self.base_url, room_id);
        let response = self
            .client
            .post(&url)
            .header("X-CSRFToken", &self.csrf_token)
            .form(&[("message", body)])
            .send()?;

        // Rejections come back as {error} with a 4xx status; parse the
        // body rather than failing on the status alone
        let reply: ApiReply = response.json()?;
        Self::into_message(reply)
    }

    fn upload_file(
        &mut self,
        room_id: i64,
        file_name: &str,
        data: Vec<u8>,
        caption: &str,
    ) -> ApiResult<WireMessage> {
        let url = format!("{}/chat/api/upload/{}/", self.base_url, room_id);
        let form = Form::new()
            .part("file", Part::bytes(data).file_name(file_name.to_string()))
            .text("message", caption.to_string());

        let response = self
            .client
            .post(&url)
            .header("X-CSRFToken", &self.csrf_token)
            .multipart(form)
            .send()?;

        let reply: ApiReply = response.json()?;
        Self::into_message(reply)
    }
}
