use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Path of the agent route, relative to the server root.
pub const AGENT_ROUTE: &str = "/api/agent";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Only these two roles travel over the wire; anything else fails to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Request from client to server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRequest {
    pub messages: Vec<ChatMessage>,
}

impl AgentRequest {
    /// Checks the parts of the shape serde cannot express: a non-empty
    /// transcript and non-empty content on every message.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.messages.is_empty() {
            return Err(ValidationError::EmptyTranscript);
        }
        if let Some(index) = self.messages.iter().position(|m| m.content.is_empty()) {
            return Err(ValidationError::EmptyContent { index });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("messages must contain at least 1 item")]
    EmptyTranscript,
    #[error("messages[{index}].content must contain at least 1 character")]
    EmptyContent { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReply {
    pub reply: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_non_empty_transcript() {
        let request = AgentRequest {
            messages: vec![ChatMessage::assistant("Hi"), ChatMessage::user("hello")],
        };
        assert_eq!(request.validate(), Ok(()));
    }

    #[test]
    fn rejects_empty_transcript() {
        let request = AgentRequest { messages: vec![] };
        assert_eq!(request.validate(), Err(ValidationError::EmptyTranscript));
    }

    #[test]
    fn reports_first_empty_message() {
        let request = AgentRequest {
            messages: vec![
                ChatMessage::user("a"),
                ChatMessage::assistant(""),
                ChatMessage::user(""),
            ],
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err, ValidationError::EmptyContent { index: 1 });
        assert_eq!(
            err.to_string(),
            "messages[1].content must contain at least 1 character"
        );
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }

    #[test]
    fn unknown_role_fails_to_deserialize() {
        let body = r#"{"messages":[{"role":"system","content":"x"}]}"#;
        assert!(serde_json::from_str::<AgentRequest>(body).is_err());
    }

    #[test]
    fn missing_content_fails_to_deserialize() {
        let body = r#"{"messages":[{"role":"user"}]}"#;
        assert!(serde_json::from_str::<AgentRequest>(body).is_err());
    }
}
