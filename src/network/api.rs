use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::common::{ChatMessage, ConversationContext};

use super::error::ApiError;

#[derive(Serialize)]
struct MessagesQuery<'a> {
    help_id: i64,
    me: &'a str,
    peer: &'a str,
}

#[derive(Serialize)]
struct SendBody<'a> {
    help_id: i64,
    sender: &'a str,
    receiver: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct SendReply {
    ok: Option<bool>,
    error: Option<String>,
}

/// Result of a send request that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub status: StatusCode,
    pub body: String,
}

impl SendOutcome {
    /// Why the server refused the message, if it did.
    pub fn rejection(&self) -> Option<String> {
        let reply = serde_json::from_str::<SendReply>(&self.body).ok();
        let explicit = reply.as_ref().and_then(|reply| match reply.ok {
            Some(false) => Some(
                reply
                    .error
                    .clone()
                    .unwrap_or_else(|| "server reported failure".to_string()),
            ),
            _ => None,
        });

        match explicit {
            Some(reason) => Some(reason),
            None if !self.status.is_success() => Some(format!("HTTP {}", self.status)),
            None => None,
        }
    }
}

/// Thin wrapper over the two REST endpoints of the chat server.
#[derive(Debug, Clone)]
pub struct ChatApi {
    http: Client,
    base_url: String,
}

impl ChatApi {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch every message of the conversation.
    ///
    /// Returns `Ok(None)` when the body is valid JSON but not an array. Every
    /// array element yields exactly one message.
    pub async fn fetch_messages(
        &self,
        context: &ConversationContext,
    ) -> Result<Option<Vec<ChatMessage>>, ApiError> {
        let body = self
            .http
            .get(self.endpoint("/api/messages"))
            .query(&MessagesQuery {
                help_id: context.help_id,
                me: &context.me,
                peer: &context.peer,
            })
            .send()
            .await?
            .text()
            .await?;

        let serde_json::Value::Array(rows) = serde_json::from_str::<serde_json::Value>(&body)? else {
            return Ok(None);
        };

        Ok(Some(rows.into_iter().map(ChatMessage::from_row).collect()))
    }

    /// Post one message. Any HTTP status counts as completion.
    pub async fn send_message(
        &self,
        context: &ConversationContext,
        content: &str,
    ) -> Result<SendOutcome, ApiError> {
        let response = self
            .http
            .post(self.endpoint("/api/send"))
            .json(&SendBody {
                help_id: context.help_id,
                sender: &context.me,
                receiver: &context.peer,
                content,
            })
            .send()
            .await?;

        let status = response.status();
        // The body only feeds the rejection log.
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                log::debug!("Failed to read send response body: {err}");
                String::new()
            }
        };

        Ok(SendOutcome { status, body })
    }
}
