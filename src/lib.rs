//! Chatterbox: a hands-free voice chat companion
//!
//! Listens on the microphone, transcribes speech, answers with a short
//! canned reply, and voices the answer through the `ElevenLabs` API. Without
//! an API key the conversation still runs, with speaking time simulated.

pub mod error;
pub mod responder;
pub mod session;
pub mod settings;
pub mod setup;
pub mod status;
pub mod transcript;
pub mod voice;

pub use error::{Error, Result};
pub use session::Session;
pub use settings::{Settings, SettingsStore};
pub use status::{Status, StatusSink, TermStatus};
pub use transcript::{ConversationEntry, Speaker, Transcript};
