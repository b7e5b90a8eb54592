//! Persisted user settings
//!
//! A small TOML file holding the synthesis credential, the selected voice,
//! and the display theme. Loaded once at startup; written on explicit user
//! save actions. Missing file or missing keys fall back to defaults.
//! `ELEVENLABS_API_KEY` in the environment overrides the stored credential.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default synthesis voice ("Rachel")
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";

/// User-facing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// ElevenLabs API key. Absent or empty is a valid configuration:
    /// synthesis degrades to a simulated speaking delay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,

    /// Selected synthesis voice identifier
    #[serde(default = "default_voice_id")]
    pub voice_id: String,

    /// Dark terminal theme for transcript rendering
    #[serde(default)]
    pub dark_mode: bool,
}

fn default_voice_id() -> String {
    DEFAULT_VOICE_ID.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credential: None,
            voice_id: default_voice_id(),
            dark_mode: false,
        }
    }
}

impl Settings {
    /// The credential, with empty strings treated as absent
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref().filter(|c| !c.is_empty())
    }
}

/// Loads and saves [`Settings`] at a fixed path
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store at the default config path
    /// (`~/.config/chatterbox/config.toml` on Linux)
    ///
    /// # Errors
    ///
    /// Returns error if the config directory cannot be determined
    pub fn new() -> Result<Self> {
        let base = directories::BaseDirs::new()
            .ok_or_else(|| Error::Config("could not determine config directory".to_string()))?;
        Ok(Self {
            path: base.config_dir().join("chatterbox").join("config.toml"),
        })
    }

    /// Create a store at an explicit path
    #[must_use]
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the settings file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// unparseable. The environment credential takes precedence over the file.
    #[must_use]
    pub fn load(&self) -> Settings {
        let mut settings = if self.path.exists() {
            match std::fs::read_to_string(&self.path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(settings) => {
                        tracing::debug!(path = %self.path.display(), "loaded settings");
                        settings
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %self.path.display(),
                            error = %e,
                            "failed to parse settings file, using defaults"
                        );
                        Settings::default()
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "failed to read settings file"
                    );
                    Settings::default()
                }
            }
        } else {
            Settings::default()
        };

        if let Ok(key) = std::env::var("ELEVENLABS_API_KEY")
            && !key.is_empty()
        {
            settings.credential = Some(key);
        }

        settings
    }

    /// Write settings to disk, creating the parent directory if needed
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(settings)
            .map_err(|e| Error::Config(format!("failed to serialize settings: {e}")))?;
        std::fs::write(&self.path, content)?;

        tracing::info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at_path(dir.path().join("config.toml"));

        let settings = store.load();
        assert_eq!(settings.voice_id, DEFAULT_VOICE_ID);
        assert!(!settings.dark_mode);
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at_path(dir.path().join("config.toml"));

        let settings = Settings {
            credential: Some("xi-test-key".to_string()),
            voice_id: "v42".to_string(),
            dark_mode: true,
        };
        store.save(&settings).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.voice_id, "v42");
        assert!(loaded.dark_mode);
    }

    #[test]
    fn cleared_credential_stays_cleared_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at_path(dir.path().join("config.toml"));

        store
            .save(&Settings {
                credential: Some("xi-test-key".to_string()),
                ..Settings::default()
            })
            .unwrap();

        let mut settings = store.load();
        settings.credential = None;
        store.save(&settings).unwrap();

        // Read the file directly so an ambient env override cannot mask it
        let content = std::fs::read_to_string(store.path()).unwrap();
        let reloaded: Settings = toml::from_str(&content).unwrap();
        assert!(reloaded.credential().is_none());
    }

    #[test]
    fn empty_credential_treated_as_absent() {
        let settings = Settings {
            credential: Some(String::new()),
            ..Settings::default()
        };
        assert!(settings.credential().is_none());
    }
}
