//! Transcript entry types shared by the session and the renderer.

/// One transcript entry. Never edited once pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

impl ChatRole {
    /// Speaker label used when replaying history to the model.
    pub fn label(&self) -> &'static str {
        match self {
            ChatRole::User => "Human",
            ChatRole::Assistant => "Cat",
        }
    }
}
