//! Speech-to-text (STT) processing

use async_trait::async_trait;

use crate::{Error, Result};

/// Default transcription model
const STT_MODEL: &str = "scribe_v1";

/// Response from the ElevenLabs transcription API
#[derive(serde::Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Transcribes a finalized utterance. Behind a trait so the conversation
/// loop can be driven without network access.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe WAV audio bytes to text
    async fn transcribe(&self, wav: Vec<u8>) -> Result<String>;
}

/// Transcribes speech via the ElevenLabs speech-to-text endpoint
pub struct SpeechToText {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SpeechToText {
    /// Create a new STT instance
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "ElevenLabs API key required for speech recognition".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: super::API_BASE.to_string(),
        })
    }
}

#[async_trait]
impl Transcriber for SpeechToText {
    async fn transcribe(&self, wav: Vec<u8>) -> Result<String> {
        tracing::debug!(audio_bytes = wav.len(), "starting transcription");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(wav)
                    .file_name("utterance.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model_id", STT_MODEL);

        let response = self
            .client
            .post(format!("{}/speech-to-text", self.base_url))
            .header("xi-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "transcription API error");
            return Err(Error::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let result: TranscriptionResponse = response.json().await?;
        tracing::info!(transcript = %result.text, "transcription complete");
        Ok(result.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected() {
        assert!(SpeechToText::new(String::new()).is_err());
    }

    #[test]
    fn response_parses() {
        let result: TranscriptionResponse =
            serde_json::from_str(r#"{"text":"hello there","language_code":"en"}"#).unwrap();
        assert_eq!(result.text, "hello there");
    }
}
