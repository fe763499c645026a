//! ChatEvent enum — broadcast from a ChatSession to TUI/Web frontends via tokio::broadcast.

use serde::{Deserialize, Serialize};

use crate::types::{Message, StatusData};

/// Events broadcast from a chat session to all subscribers (TUI, WebSocket clients).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ChatEvent {
    /// A message was appended to the transcript
    #[serde(rename = "message")]
    Message(Message),

    /// Typing indicator changed
    #[serde(rename = "status")]
    Status(StatusData),

    /// Session stopped; pending replies were dropped
    #[serde(rename = "closed")]
    Closed,
}

impl ChatEvent {
    /// Serialize to the JSON format the frontend expects:
    /// `{"event": "...", "data": {...}}`
    pub fn to_ws_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatState;

    #[test]
    fn test_ws_json_shape() {
        let json = ChatEvent::Status(StatusData {
            state: ChatState::Typing,
            pending: 2,
        })
        .to_ws_json();
        assert_eq!(json["event"], "status");
        assert_eq!(json["data"]["state"], "typing");
        assert_eq!(json["data"]["pending"], 2);

        assert_eq!(ChatEvent::Closed.to_ws_json()["event"], "closed");
    }
}
