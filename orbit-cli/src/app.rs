use orbit_shared::{AgentRequest, ChatMessage, MessageRole};
use tracing::{error, info};
use uuid::Uuid;

use crate::client::ClientError;

pub const INTRO_MESSAGE: &str =
    "Hi, I'm Orbit. Ask me anything and I'll pass it along to the agent.";
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong reaching the agent. Please try again.";
const GENERIC_ERROR: &str = "Something went wrong";

/// A rendered chat entry. The id only keys the list; it never leaves the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    fn new(role: MessageRole, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Network,
    Status(u16),
    Malformed,
}

impl From<&ClientError> for FailureReason {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::Network(_) => FailureReason::Network,
            ClientError::Status { status, .. } => FailureReason::Status(*status),
            ClientError::Malformed(_) => FailureReason::Malformed,
        }
    }
}

/// Lifecycle of the most recent submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Idle,
    Pending,
    Succeeded,
    Failed(FailureReason),
}

pub struct ChatState {
    messages: Vec<Message>,
    draft: String,
    // in chars, not bytes
    cursor: usize,
    submission: Submission,
    error: Option<String>,
    scroll_offset: usize,
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::new(MessageRole::Assistant, INTRO_MESSAGE.to_string())],
            draft: String::new(),
            cursor: 0,
            submission: Submission::Idle,
            error: None,
            scroll_offset: 0,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn is_loading(&self) -> bool {
        self.submission == Submission::Pending
    }

    pub fn can_submit(&self) -> bool {
        !self.draft.trim().is_empty() && !self.is_loading()
    }

    pub fn placeholder(&self) -> &'static str {
        if self.is_loading() {
            "Orbit is thinking..."
        } else if self.messages.len() <= 1 {
            "Ask Orbit anything..."
        } else {
            "Send a follow-up..."
        }
    }

    /// Appends the draft as a user message and returns the transcript to post.
    ///
    /// Returns `None` and leaves the state untouched when nothing can be
    /// submitted; the caller must not issue a request in that case.
    pub fn submit(&mut self) -> Option<AgentRequest> {
        if !self.can_submit() {
            return None;
        }

        let content = self.draft.trim().to_string();
        self.push_message(MessageRole::User, content);
        self.draft.clear();
        self.cursor = 0;
        self.error = None;
        self.submission = Submission::Pending;

        info!("Submitting transcript of {} messages", self.messages.len());
        Some(self.transcript())
    }

    /// Applies the outcome of the pending request.
    pub fn settle(&mut self, result: Result<String, ClientError>) {
        let outcome = result.and_then(|reply| {
            let reply = reply.trim();
            if reply.is_empty() {
                Err(ClientError::Malformed("empty reply".to_string()))
            } else {
                Ok(reply.to_string())
            }
        });

        match outcome {
            Ok(reply) => {
                self.push_message(MessageRole::Assistant, reply);
                self.submission = Submission::Succeeded;
            }
            Err(err) => {
                error!("Agent request failed: {}", err);
                let description = err.to_string();
                self.error = Some(if description.trim().is_empty() {
                    GENERIC_ERROR.to_string()
                } else {
                    description
                });
                self.push_message(MessageRole::Assistant, FALLBACK_REPLY.to_string());
                self.submission = Submission::Failed(FailureReason::from(&err));
            }
        }
    }

    /// The wire form of the conversation: role and content only.
    pub fn transcript(&self) -> AgentRequest {
        AgentRequest {
            messages: self
                .messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role,
                    content: m.content.clone(),
                })
                .collect(),
        }
    }

    fn push_message(&mut self, role: MessageRole, content: String) {
        self.messages.push(Message::new(role, content));
        self.scroll_to_bottom();
    }

    fn byte_index(&self) -> usize {
        self.draft
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.draft.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let index = self.byte_index();
        self.draft.insert(index, c);
        self.cursor += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let index = self.byte_index();
            self.draft.remove(index);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.draft.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.draft.chars().count();
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(amount);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}
