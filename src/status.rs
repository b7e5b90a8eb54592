//! Status indicator
//!
//! Maps session states to a visible label and color. Purely a sink: the
//! conversation loop pushes updates, the terminal renders them.

use std::fmt;

/// Named session states shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Idle, waiting for a start command
    Ready,
    /// Capturing speech
    Listening,
    /// Generating a reply for an utterance
    Processing,
    /// Playing (or simulating) synthesized speech
    Speaking,
    /// Transient failure message
    Error(String),
}

impl Status {
    /// User-facing label
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Ready => "Ready",
            Self::Listening => "Listening...",
            Self::Processing => "Thinking...",
            Self::Speaking => "Speaking...",
            Self::Error(msg) => msg,
        }
    }

    /// ANSI color code for the status light
    #[must_use]
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Ready => "\x1b[90m",
            Self::Listening => "\x1b[32m",
            Self::Processing => "\x1b[33m",
            Self::Speaking => "\x1b[36m",
            Self::Error(_) => "\x1b[31m",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Receives status updates from the conversation loop
pub trait StatusSink: Send + Sync {
    /// Display the new status
    fn update(&self, status: &Status);
}

/// Renders the status light to the terminal
#[derive(Debug, Default)]
pub struct TermStatus;

impl TermStatus {
    /// Create a terminal status renderer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl StatusSink for TermStatus {
    fn update(&self, status: &Status) {
        eprintln!("{}\u{25cf} {}\x1b[0m", status.color(), status.label());
    }
}
