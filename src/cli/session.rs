//! Conversation history kept by the interactive host.
//!
//! The chatbot itself is stateless; history exists only so the user can
//! review it with `/history` and wipe it with `/clear`.

use std::fmt;

use serde::Serialize;

/// Who said something.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message in the conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

/// The ordered history of a chat session.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<S: Into<String>>(&mut self, role: Role, content: S) {
        self.turns.push(ConversationTurn {
            role,
            content: content.into(),
        });
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

/// A line of input to the interactive loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatInput<'a> {
    /// Forget the history.
    Clear,
    /// Print the history.
    History,
    /// Leave the session.
    Quit,
    /// Show the available commands.
    Help,
    /// A `/command` that is not recognized.
    Unknown(&'a str),
    /// An utterance for the chatbot.
    Message(&'a str),
}

impl<'a> ChatInput<'a> {
    /// Interpret one input line; `None` for a blank line.
    pub fn parse(line: &'a str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let input = match trimmed {
            "/clear" => ChatInput::Clear,
            "/history" => ChatInput::History,
            "/quit" | "/exit" => ChatInput::Quit,
            "/help" => ChatInput::Help,
            command if command.starts_with('/') => ChatInput::Unknown(command),
            _ => ChatInput::Message(line.trim_end_matches(['\r', '\n'])),
        };
        Some(input)
    }
}
