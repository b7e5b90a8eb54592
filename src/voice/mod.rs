//! Voice processing module
//!
//! Microphone capture, utterance segmentation, speech recognition,
//! speech synthesis, and playback.

mod capture;
mod directory;
mod playback;
mod recognizer;
mod segmenter;
mod stt;
mod tts;

pub use capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
pub use directory::{Voice, VoiceDirectory};
pub use playback::{AudioPlayback, AudioSink};
pub use recognizer::{CaptureControl, CaptureSource, Recognizer};
pub use segmenter::UtteranceSegmenter;
pub use stt::{SpeechToText, Transcriber};
pub use tts::{DEFAULT_MODEL_ID, Synthesizer, TextToSpeech};

/// Base URL of the ElevenLabs API
pub const API_BASE: &str = "https://api.elevenlabs.io/v1";
