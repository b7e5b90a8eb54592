//! Voice directory
//!
//! Fetches the list of available synthesis voices and tracks the current
//! selection. A refresh replaces the whole list atomically; the previous
//! selection survives iff its id is still present.

use serde::Deserialize;

use crate::{Error, Result};

/// One selectable synthesis voice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// API voice identifier
    pub id: String,
    /// Human-readable name
    pub display_name: String,
}

/// Wire format of the voices listing
#[derive(Deserialize)]
struct VoicesResponse {
    voices: Vec<VoiceEntry>,
}

#[derive(Deserialize)]
struct VoiceEntry {
    voice_id: String,
    name: String,
}

/// Holds the known voices and the current selection
pub struct VoiceDirectory {
    client: reqwest::Client,
    base_url: String,
    voices: Vec<Voice>,
    selected: Option<String>,
}

impl VoiceDirectory {
    /// Create a directory with an initial selection (typically the persisted
    /// voice id) and no fetched voices yet
    #[must_use]
    pub fn new(selected: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: super::API_BASE.to_string(),
            voices: Vec::new(),
            selected,
        }
    }

    /// Fetch the voice list, replacing the current one on success
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] immediately when the credential is empty, or
    /// [`Error::Api`]/[`Error::Http`] on a failed request. On any failure the
    /// previous list is left untouched.
    pub async fn refresh(&mut self, credential: &str) -> Result<()> {
        if credential.is_empty() {
            return Err(Error::Config("missing credential".to_string()));
        }

        let response = self
            .client
            .get(format!("{}/voices", self.base_url))
            .header("xi-api-key", credential)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "voices API error");
            return Err(Error::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let listing: VoicesResponse = response.json().await?;
        let voices = listing
            .voices
            .into_iter()
            .map(|v| Voice {
                id: v.voice_id,
                display_name: v.name,
            })
            .collect();

        self.replace(voices);
        tracing::info!(count = self.voices.len(), "voice list refreshed");
        Ok(())
    }

    /// Replace the list atomically, retaining the selection only when its id
    /// is still present
    fn replace(&mut self, voices: Vec<Voice>) {
        self.voices = voices;
        if let Some(id) = &self.selected
            && !self.voices.iter().any(|v| &v.id == id)
        {
            self.selected = None;
        }
    }

    /// Currently known voices
    #[must_use]
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Currently selected voice id, if any
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select a voice by id. Ignored when the id is unknown.
    pub fn select(&mut self, id: &str) {
        if self.voices.iter().any(|v| v.id == id) {
            self.selected = Some(id.to_string());
        }
    }
}
