//! Client-local chat transcript. Nothing here is persisted.

pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn css_class(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

/// A transcript entry. Text is kept as plain line segments; renderers decide
/// how to separate them and are responsible for escaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub lines: Vec<String>,
}

impl ChatMessage {
    pub fn user(text: &str) -> Self {
        Self {
            sender: Sender::User,
            lines: vec![text.to_string()],
        }
    }

    pub fn bot(text: &str) -> Self {
        Self {
            sender: Sender::Bot,
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
