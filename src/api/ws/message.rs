// src/api/ws/message.rs
// Websocket frame shapes for the editor chat panel

use serde::{Deserialize, Serialize};

use crate::api::error::{GatewayError, GatewayResult};

/// Raw inbound frame as sent by the editor. Every field is optional here so
/// that a missing field is reported by name instead of as a serde error.
#[derive(Debug, Default, Deserialize)]
struct WsClientFrame {
    message: Option<String>,
    document_id: Option<String>,
    selected_text: Option<String>,
    user_id: Option<String>,
}

/// A validated editing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub user_id: String,
    pub message: String,
    pub document_id: String,
    pub selected_text: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl EditRequest {
    /// Decode a text frame. `connection_user` is the identity bound at upgrade
    /// time (path or query); when present it takes precedence over the frame's
    /// own `user_id`.
    pub fn decode(text: &str, connection_user: Option<&str>) -> GatewayResult<Self> {
        let frame: WsClientFrame = serde_json::from_str(text)
            .map_err(|e| GatewayError::malformed(format!("not a valid JSON message ({})", e)))?;

        let message =
            non_blank(frame.message).ok_or_else(|| GatewayError::malformed("message is required"))?;
        let document_id = non_blank(frame.document_id)
            .ok_or_else(|| GatewayError::malformed("document_id is required"))?;

        let user_id = match connection_user {
            Some(user) => user.to_string(),
            None => non_blank(frame.user_id)
                .ok_or_else(|| GatewayError::malformed("user_id is required on this endpoint"))?,
        };

        Ok(Self {
            user_id,
            message,
            document_id,
            selected_text: non_blank(frame.selected_text),
        })
    }
}

/// Messages sent from the server to the editor
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum WsServerMessage {
    /// Signals that the server is connected and ready
    #[serde(rename = "connection_ready")]
    ConnectionReady { user_id: Option<String> },

    /// Completion text for the last request
    #[serde(rename = "response")]
    Response { response: String },

    /// An error message
    #[serde(rename = "error")]
    Error { message: String, code: String },
}

impl From<&GatewayError> for WsServerMessage {
    fn from(err: &GatewayError) -> Self {
        WsServerMessage::Error {
            message: err.client_message(),
            code: err.code().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_editor_frame() {
        let text = json!({
            "user_id": "user123",
            "message": "Rewrite this",
            "document_id": "doc1",
            "selected_text": ""
        })
        .to_string();

        let request = EditRequest::decode(&text, None).unwrap();
        assert_eq!(request.user_id, "user123");
        assert_eq!(request.message, "Rewrite this");
        assert_eq!(request.document_id, "doc1");
        assert_eq!(request.selected_text, None);
    }

    #[test]
    fn test_connection_identity_wins() {
        let text = r#"{"user_id":"mallory","message":"hi","document_id":"d"}"#;
        let request = EditRequest::decode(text, Some("alice")).unwrap();
        assert_eq!(request.user_id, "alice");
    }

    #[test]
    fn test_missing_fields_are_named() {
        let err = EditRequest::decode(r#"{"document_id":"d"}"#, Some("alice")).unwrap_err();
        assert_eq!(err, GatewayError::malformed("message is required"));

        let err = EditRequest::decode(r#"{"message":"hi","document_id":"  "}"#, Some("alice"))
            .unwrap_err();
        assert_eq!(err, GatewayError::malformed("document_id is required"));

        let err = EditRequest::decode(r#"{"message":"hi","document_id":"d"}"#, None).unwrap_err();
        assert_eq!(
            err,
            GatewayError::malformed("user_id is required on this endpoint")
        );
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = EditRequest::decode("hello", Some("alice")).unwrap_err();
        assert_eq!(err.code(), "MALFORMED_MESSAGE");

        let err = EditRequest::decode(r#"{"message":5,"document_id":"d"}"#, Some("alice"))
            .unwrap_err();
        assert_eq!(err.code(), "MALFORMED_MESSAGE");
    }

    #[test]
    fn test_server_message_shapes() {
        let response = serde_json::to_value(WsServerMessage::Response {
            response: "R1".to_string(),
        })
        .unwrap();
        assert_eq!(response, json!({"type": "response", "response": "R1"}));

        let error = serde_json::to_value(WsServerMessage::from(&GatewayError::malformed(
            "message is required",
        )))
        .unwrap();
        assert_eq!(
            error,
            json!({
                "type": "error",
                "message": "Invalid message: message is required",
                "code": "MALFORMED_MESSAGE"
            })
        );
    }
}
