//! Message and Conversation domain types.
//!
//! A conversation is the append-only log one agent run builds up:
//! system instructions → user query → (assistant reply → observation)*.
//! It is rendered back into a single prompt string before every model call.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Tool catalogue and response-format instructions
    System,
    /// The query, observations, and corrective prompts
    User,
    /// Raw model replies
    Assistant,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,
}

impl Message {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Render this message the way the prompt template expects.
    pub fn render(&self) -> String {
        match self.role {
            Role::System => format!("System Instructions:\n{}\n", self.content),
            Role::User => format!("User: {}\n", self.content),
            Role::Assistant => format!("Assistant: {}\n", self.content),
        }
    }
}

/// An ordered, append-only sequence of messages.
///
/// Messages are only ever added through [`Conversation::push`]; there is no
/// API for editing or removing one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Create a new empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message to the conversation.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// All messages in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Render the whole conversation into one prompt string.
    pub fn render_prompt(&self) -> String {
        self.messages
            .iter()
            .map(Message::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("Hello, agent!");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello, agent!");
    }

    #[test]
    fn push_appends_in_order() {
        let mut conv = Conversation::new();
        assert!(conv.is_empty());

        conv.push(Message::user("First message"));
        conv.push(Message::assistant("Second message"));
        assert_eq!(conv.len(), 2);
        assert_eq!(conv.messages()[0].role, Role::User);
        assert_eq!(conv.messages()[1].content, "Second message");
    }

    #[test]
    fn render_prompt_uses_role_headers() {
        let mut conv = Conversation::new();
        conv.push(Message::system("Be precise."));
        conv.push(Message::user("Where is the Colosseum?"));
        conv.push(Message::assistant("THOUGHT: easy"));

        assert_eq!(
            conv.render_prompt(),
            "System Instructions:\nBe precise.\n\nUser: Where is the Colosseum?\n\nAssistant: THOUGHT: easy\n"
        );
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("x")).unwrap();
        assert!(json.contains("\"assistant\""));
    }
}
