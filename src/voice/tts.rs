//! Text-to-speech (TTS) processing

use async_trait::async_trait;

use crate::{Error, Result};

/// Default ElevenLabs model
pub const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";

/// Fixed voice-quality parameters
const STABILITY: f32 = 0.5;
const SIMILARITY_BOOST: f32 = 0.5;

/// Produces audio for a reply. Behind a trait so the conversation loop can
/// be driven without network access.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize text to MP3 bytes
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// Synthesizes speech through the ElevenLabs API
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: String,
    voice_id: String,
    model: String,
    base_url: String,
}

impl TextToSpeech {
    /// Create a new TTS instance
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(api_key: String, voice_id: String) -> Result<Self> {
        Self::with_model(api_key, voice_id, DEFAULT_MODEL_ID.to_string())
    }

    /// Create a new TTS instance with a custom model
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn with_model(api_key: String, voice_id: String, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "ElevenLabs API key required for TTS".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            voice_id,
            model,
            base_url: super::API_BASE.to_string(),
        })
    }

    /// The voice this instance synthesizes with
    #[must_use]
    pub fn voice_id(&self) -> &str {
        &self.voice_id
    }

    /// Synthesize text to speech
    ///
    /// # Returns
    ///
    /// Audio bytes (MP3 format)
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-2xx response. No retry.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct VoiceSettings {
            stability: f32,
            similarity_boost: f32,
        }

        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            text: &'a str,
            model_id: &'a str,
            voice_settings: VoiceSettings,
        }

        let request = TtsRequest {
            text,
            model_id: &self.model,
            voice_settings: VoiceSettings {
                stability: STABILITY,
                similarity_boost: SIMILARITY_BOOST,
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/text-to-speech/{}",
                self.base_url, self.voice_id
            ))
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "TTS API error");
            return Err(Error::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let audio = response.bytes().await?;
        tracing::debug!(audio_bytes = audio.len(), "synthesis complete");
        Ok(audio.to_vec())
    }
}

#[async_trait]
impl Synthesizer for TextToSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        Self::synthesize(self, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected() {
        assert!(TextToSpeech::new(String::new(), "v1".to_string()).is_err());
    }

    #[test]
    fn keeps_configured_voice() {
        let tts = TextToSpeech::new("key".to_string(), "v1".to_string()).unwrap();
        assert_eq!(tts.voice_id(), "v1");
    }
}
