//! Interactive first-run setup wizard (`chatterbox setup`)

use dialoguer::{Confirm, Input, Select};

use crate::settings::SettingsStore;
use crate::voice::VoiceDirectory;

/// Run the interactive setup wizard
///
/// # Errors
///
/// Returns error if user input fails or settings cannot be written
pub async fn run_setup() -> anyhow::Result<()> {
    println!("Chatterbox Setup\n");

    let store = SettingsStore::new()?;
    let mut settings = store.load();

    if store.path().exists() {
        println!("Existing settings found at {}\n", store.path().display());
    }

    // 1. ElevenLabs API key
    if let Some(key) = settings.credential().map(str::to_string) {
        let masked = if key.len() > 8 {
            format!("{}...{}", &key[..4], &key[key.len() - 4..])
        } else {
            "****".to_string()
        };

        let choices = [
            "Keep current key",
            "Enter a new key",
            "Clear the key (simulated speech)",
        ];
        let choice = Select::new()
            .with_prompt(format!("ElevenLabs API key (current: {masked})"))
            .items(&choices)
            .default(0)
            .interact()?;

        match choice {
            1 => {
                let key_input: String = Input::new()
                    .with_prompt("New API key (blank clears)")
                    .allow_empty(true)
                    .interact_text()?;
                settings.credential = if key_input.is_empty() {
                    None
                } else {
                    Some(key_input)
                };
            }
            2 => settings.credential = None,
            _ => {}
        }
    } else {
        let key_input: String = Input::new()
            .with_prompt("ElevenLabs API key (ELEVENLABS_API_KEY, blank for simulated speech)")
            .allow_empty(true)
            .interact_text()?;
        if !key_input.is_empty() {
            settings.credential = Some(key_input);
        }
    }

    // 2. Voice selection, when a key is available to list voices with
    if let Some(credential) = settings.credential().map(str::to_string) {
        let mut directory = VoiceDirectory::new(Some(settings.voice_id.clone()));
        match directory.refresh(&credential).await {
            Ok(()) => {
                let labels: Vec<String> = directory
                    .voices()
                    .iter()
                    .map(|v| format!("{} ({})", v.display_name, v.id))
                    .collect();
                if labels.is_empty() {
                    println!("No voices available on this account, keeping current voice");
                } else {
                    let default = directory
                        .voices()
                        .iter()
                        .position(|v| v.id == settings.voice_id)
                        .unwrap_or(0);

                    let idx = Select::new()
                        .with_prompt("Select a voice")
                        .items(&labels)
                        .default(default)
                        .interact()?;
                    settings.voice_id = directory.voices()[idx].id.clone();
                }
            }
            Err(e) => {
                println!("Could not fetch voices ({e}), keeping current voice");
            }
        }
    }

    // 3. Theme
    settings.dark_mode = Confirm::new()
        .with_prompt("Use dark mode colors")
        .default(settings.dark_mode)
        .interact()?;

    store.save(&settings)?;
    println!("\nSettings written to {}", store.path().display());

    Ok(())
}
