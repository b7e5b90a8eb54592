//! Placeholder response generation
//!
//! Stateless mapping from an utterance to a reply: a fixed "thinking" delay
//! followed by a uniformly random pick from a canned list. Stands in for a
//! real language model.

use std::time::Duration;

use rand::seq::SliceRandom;

/// The fixed reply set. Every generated reply comes from this list.
pub const CANNED_REPLIES: [&str; 8] = [
    "I understand what you're saying. That's an interesting point.",
    "Thanks for sharing that with me. How can I help you further?",
    "I've noted your input. Is there anything specific you'd like to know?",
    "That's a great question. Let me think about how I can assist you with that.",
    "I appreciate you telling me that. What else would you like to discuss?",
    "I'm here to help. Could you tell me more about what you're looking for?",
    "That's fascinating. I'd be happy to assist you with that topic.",
    "I see. What would you like to know more about?",
];

/// Simulated generation latency
const REPLY_DELAY: Duration = Duration::from_secs(1);

/// Generates placeholder replies
#[derive(Debug, Default, Clone, Copy)]
pub struct Responder;

impl Responder {
    /// Create a responder
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Produce a reply for an utterance. Always succeeds; the input is
    /// ignored by the placeholder implementation.
    pub async fn reply(&self, _utterance: &str) -> String {
        tokio::time::sleep(REPLY_DELAY).await;
        pick_reply()
    }
}

/// Random pick from the canned set
fn pick_reply() -> String {
    CANNED_REPLIES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(CANNED_REPLIES[0])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_always_from_canned_set() {
        for _ in 0..100 {
            let reply = pick_reply();
            assert!(CANNED_REPLIES.contains(&reply.as_str()));
            assert!(!reply.is_empty());
        }
    }

    #[test]
    fn canned_set_has_eight_entries() {
        assert_eq!(CANNED_REPLIES.len(), 8);
        assert!(CANNED_REPLIES.iter().all(|r| !r.is_empty()));
    }
}
