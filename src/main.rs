use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chatterbox::voice::{
    AudioCapture, AudioPlayback, AudioSink, Recognizer, SpeechToText, TextToSpeech, VoiceDirectory,
};
use chatterbox::{Session, Settings, SettingsStore, TermStatus};

/// Chatterbox - hands-free voice chat companion
#[derive(Parser)]
#[command(name = "chatterbox", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List available voices and pick one
    Voices,
    /// Speak a line of text and exit
    Say {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Interactive first-run setup
    Setup,
    /// Toggle dark mode colors
    Theme,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn,chatterbox=info",
        1 => "info,chatterbox=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Voices => cmd_voices().await,
            Command::Say { text } => cmd_say(&text).await,
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker().await,
            Command::Setup => chatterbox::setup::run_setup().await,
            Command::Theme => cmd_theme(),
        };
    }

    let store = SettingsStore::new()?;
    let settings = store.load();

    tracing::info!(
        voice = %settings.voice_id,
        has_credential = settings.credential().is_some(),
        "starting chatterbox"
    );

    let mut session = build_session(&settings)?;
    session.run().await?;

    Ok(())
}

/// Assemble the interactive session from settings
fn build_session(settings: &Settings) -> anyhow::Result<Session<Recognizer>> {
    let credential = settings.credential();

    let tts: Option<Box<dyn chatterbox::voice::Synthesizer>> = match credential {
        Some(key) => Some(Box::new(TextToSpeech::new(
            key.to_string(),
            settings.voice_id.clone(),
        )?)),
        None => {
            tracing::info!("no API key configured, speech will be simulated");
            None
        }
    };

    let transcriber: Box<dyn chatterbox::voice::Transcriber> = match credential {
        Some(key) => Box::new(SpeechToText::new(key.to_string())?),
        // Without a credential nothing can transcribe; the typed-input path
        // in the session still works.
        None => Box::new(NullTranscriber),
    };

    let recognizer = Recognizer::new(transcriber);

    Ok(Session::new(
        recognizer,
        tts,
        Box::new(AudioPlayback::new()),
        Arc::new(TermStatus),
        settings.dark_mode,
    ))
}

/// Transcriber used when no credential is configured
struct NullTranscriber;

#[async_trait::async_trait]
impl chatterbox::voice::Transcriber for NullTranscriber {
    async fn transcribe(&self, _wav: Vec<u8>) -> chatterbox::Result<String> {
        Ok(String::new())
    }
}

/// List voices and persist the chosen one
async fn cmd_voices() -> anyhow::Result<()> {
    let store = SettingsStore::new()?;
    let mut settings = store.load();

    let Some(credential) = settings.credential().map(str::to_string) else {
        println!("Please enter your ElevenLabs API key first (run `chatterbox setup`)");
        return Ok(());
    };

    let mut directory = VoiceDirectory::new(Some(settings.voice_id.clone()));
    directory.refresh(&credential).await?;

    let labels: Vec<String> = directory
        .voices()
        .iter()
        .map(|v| format!("{} ({})", v.display_name, v.id))
        .collect();

    if labels.is_empty() {
        println!("No voices available on this account");
        return Ok(());
    }

    let default = directory
        .voices()
        .iter()
        .position(|v| v.id == settings.voice_id)
        .unwrap_or(0);

    let idx = dialoguer::Select::new()
        .with_prompt("Select a voice")
        .items(&labels)
        .default(default)
        .interact()?;

    settings.voice_id = directory.voices()[idx].id.clone();
    store.save(&settings)?;
    println!("Voice set to {}", labels[idx]);

    Ok(())
}

/// Synthesize one line and play it
async fn cmd_say(text: &str) -> anyhow::Result<()> {
    let store = SettingsStore::new()?;
    let settings = store.load();

    let Some(credential) = settings.credential() else {
        println!("Please enter your ElevenLabs API key first (run `chatterbox setup`)");
        return Ok(());
    };

    println!("Synthesizing: \"{text}\"");

    let tts = TextToSpeech::new(credential.to_string(), settings.voice_id.clone())?;
    let mp3_data = tts.synthesize(text).await?;
    println!("Got {} bytes of audio data", mp3_data.len());

    println!("Playing audio...");
    let mut playback = AudioPlayback::new();
    playback.play_mp3(&mp3_data).await?;

    println!("\n---");
    println!("If you heard the speech, synthesis is working!");

    Ok(())
}

/// Test microphone input with a one-second level meter
#[allow(clippy::future_not_send)]
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Watching the default input device for {duration} seconds.");
    println!("Say something and watch the level meter.\n");

    let mut capture = AudioCapture::new();
    capture.start()?;
    println!("Capturing at {} Hz mono\n", chatterbox::voice::SAMPLE_RATE);

    let mut heard_anything = false;
    for second in 1..=duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let level = level_of(&capture.take_buffer());
        if level > 0.01 {
            heard_anything = true;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let filled = ((level * 200.0) as usize).min(40);
        println!("{second:>3}s  {level:.4}  |{:<40}|", "=".repeat(filled));
    }

    capture.stop();

    if heard_anything {
        println!("\nMicrophone is picking up sound.");
    } else {
        println!("\nNo signal detected. Check that a microphone is connected,");
        println!("that the input volume is up, and which device is the default");
        println!("(`arecord -l` on ALSA, or your platform's sound settings).");
    }

    Ok(())
}

/// RMS level of a sample window
#[allow(clippy::cast_precision_loss)]
fn level_of(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let power: f32 = samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32;
    power.sqrt()
}

/// Test speaker output with a short two-tone chime
async fn test_speaker() -> anyhow::Result<()> {
    println!("Playing a two-tone chime through the default output device...\n");

    let mut samples = tone(523.25, 0.4);
    samples.extend(tone(659.25, 0.4));

    let mut playback = AudioPlayback::new();
    playback.play(samples).await?;

    println!("Done. If the chime was silent, check the output device and volume.");

    Ok(())
}

/// One sine tone at the 24 kHz playback rate
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn tone(frequency: f32, seconds: f32) -> Vec<f32> {
    const RATE: f32 = 24_000.0;
    let count = (RATE * seconds) as usize;
    (0..count)
        .map(|i| {
            let t = i as f32 / RATE;
            (std::f32::consts::TAU * frequency * t).sin() * 0.3
        })
        .collect()
}

/// Toggle dark mode and persist it
fn cmd_theme() -> anyhow::Result<()> {
    let store = SettingsStore::new()?;
    let mut settings = store.load();
    settings.dark_mode = !settings.dark_mode;
    store.save(&settings)?;

    let mode = if settings.dark_mode { "dark" } else { "light" };
    println!("Theme set to {mode} mode");

    Ok(())
}
