//! Conversation transcript
//!
//! Append-only record of the conversation. Entries are never mutated or
//! removed; the session renders each one as it is appended.

use std::fmt;

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    /// The human user
    User,
    /// The assistant
    Assistant,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("You"),
            Self::Assistant => f.write_str("Assistant"),
        }
    }
}

/// One turn's worth of text from one speaker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationEntry {
    /// Who spoke
    pub speaker: Speaker,
    /// What was said
    pub text: String,
}

/// Ordered, append-only conversation record
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<ConversationEntry>,
}

impl Transcript {
    /// Create an empty transcript
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry, returning a reference to it for rendering
    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) -> &ConversationEntry {
        let index = self.entries.len();
        self.entries.push(ConversationEntry {
            speaker,
            text: text.into(),
        });
        &self.entries[index]
    }

    /// All entries in order
    #[must_use]
    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Render an entry as a colored terminal line
#[must_use]
pub fn render_entry(entry: &ConversationEntry, dark_mode: bool) -> String {
    let color = match (entry.speaker, dark_mode) {
        (Speaker::User, false) => "\x1b[34m",
        (Speaker::User, true) => "\x1b[94m",
        (Speaker::Assistant, false) => "\x1b[32m",
        (Speaker::Assistant, true) => "\x1b[92m",
    };
    format!("{color}{}:\x1b[0m {}", entry.speaker, entry.text)
}
