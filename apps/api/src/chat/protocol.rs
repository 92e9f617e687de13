//! JSON frames exchanged over the support-chat socket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only inbound frame type the relay acts on.
pub const CHAT_FRAME_TYPE: &str = "chat";

#[derive(Debug, Deserialize)]
struct RawClientFrame {
    #[serde(rename = "type")]
    kind: Option<String>,
    content: Option<String>,
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

/// A parsed inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientFrame {
    Chat {
        content: String,
        /// Identity claimed inside the frame. Delivery always uses the
        /// connection's own identity.
        user_id: Option<String>,
    },
    /// Any other `type`; not handled by the relay.
    Other(String),
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("frame has no type")]
    MissingType,

    #[error("chat frame has no content")]
    MissingContent,
}

/// Parses one text frame. A chat frame with blank content is rejected.
pub fn parse_client_frame(text: &str) -> Result<ClientFrame, FrameError> {
    let raw: RawClientFrame = serde_json::from_str(text)?;
    let kind = raw.kind.ok_or(FrameError::MissingType)?;

    if kind != CHAT_FRAME_TYPE {
        return Ok(ClientFrame::Other(kind));
    }

    match raw.content {
        Some(content) if !content.trim().is_empty() => Ok(ClientFrame::Chat {
            content,
            user_id: raw.user_id.filter(|id| !id.is_empty()),
        }),
        _ => Err(FrameError::MissingContent),
    }
}

/// Frames pushed from the server to a connected client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    ChatResponse {
        content: String,
        timestamp: DateTime<Utc>,
    },
}

impl ServerFrame {
    pub fn chat_response(content: impl Into<String>) -> Self {
        ServerFrame::ChatResponse {
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}
