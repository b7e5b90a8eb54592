//! Conversation session
//!
//! Owns the listen/respond/speak loop: capture control, the canned
//! responder, speech synthesis, playback, and the transcript, with status
//! updates pushed through a [`StatusSink`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::responder::Responder;
use crate::status::{Status, StatusSink};
use crate::transcript::{Speaker, Transcript, render_entry};
use crate::voice::{AudioSink, CaptureControl, Recognizer, Synthesizer};
use crate::{Error, Result};

/// How long a transient error stays on the status line
const ERROR_DISPLAY: Duration = Duration::from_secs(2);

/// Pacing for simulated speech when no synthesis credential is set
const SIMULATED_MS_PER_CHAR: u64 = 50;

/// Poll cadence for the recognizer while listening
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A running conversation
///
/// Generic over the capture source so tests can drive the loop without a
/// microphone.
pub struct Session<C: CaptureControl> {
    capture: C,
    responder: Responder,
    tts: Option<Box<dyn Synthesizer>>,
    audio: Box<dyn AudioSink>,
    transcript: Transcript,
    status: Arc<dyn StatusSink>,
    listening: Arc<AtomicBool>,
    unsupported: bool,
    dark_mode: bool,
}

impl<C: CaptureControl> Session<C> {
    pub fn new(
        capture: C,
        tts: Option<Box<dyn Synthesizer>>,
        audio: Box<dyn AudioSink>,
        status: Arc<dyn StatusSink>,
        dark_mode: bool,
    ) -> Self {
        let session = Self {
            capture,
            responder: Responder::new(),
            tts,
            audio,
            transcript: Transcript::new(),
            status,
            listening: Arc::new(AtomicBool::new(false)),
            unsupported: false,
            dark_mode,
        };
        session.status.update(&Status::Ready);
        session
    }

    /// Begin listening for an utterance
    ///
    /// Once capture has proven unsupported the session stays in a permanent
    /// error state; transient start failures revert to [`Status::Ready`]
    /// after a short delay.
    pub fn start(&mut self) {
        if self.unsupported {
            self.status
                .update(&Status::Error("Speech recognition not supported".to_string()));
            return;
        }
        if self.listening.load(Ordering::SeqCst) {
            return;
        }

        match self.capture.start() {
            Ok(()) => {
                self.listening.store(true, Ordering::SeqCst);
                self.status.update(&Status::Listening);
            }
            Err(Error::Unsupported(reason)) => {
                tracing::warn!(reason = %reason, "speech capture unsupported");
                self.unsupported = true;
                self.status
                    .update(&Status::Error("Speech recognition not supported".to_string()));
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to start capture");
                self.report_error("Error starting microphone");
            }
        }
    }

    /// Stop listening without processing anything
    pub fn stop(&mut self) {
        if !self.listening.swap(false, Ordering::SeqCst) {
            return;
        }
        self.capture.stop();
        self.status.update(&Status::Ready);
    }

    /// Run one utterance through the respond/speak pipeline
    pub async fn handle_utterance(&mut self, utterance: &str) {
        self.listening.store(false, Ordering::SeqCst);
        self.capture.stop();
        self.status.update(&Status::Processing);

        let entry = self.transcript.push(Speaker::User, utterance);
        println!("{}", render_entry(entry, self.dark_mode));

        let reply = self.responder.reply(utterance).await;
        let entry = self.transcript.push(Speaker::Assistant, &reply);
        println!("{}", render_entry(entry, self.dark_mode));

        self.speak(&reply).await;
    }

    /// Voice the reply, or simulate speaking time when no credential is set
    async fn speak(&mut self, text: &str) {
        self.status.update(&Status::Speaking);

        if let Some(tts) = &self.tts {
            match tts.synthesize(text).await {
                Ok(mp3) => {
                    if let Err(e) = self.audio.play_mp3(&mp3).await {
                        tracing::warn!(error = %e, "playback failed");
                    }
                    self.status.update(&Status::Ready);
                }
                Err(e) => {
                    tracing::error!(error = %e, "speech synthesis failed");
                    self.report_error("Speech synthesis failed");
                }
            }
        } else {
            let millis = text.len() as u64 * SIMULATED_MS_PER_CHAR;
            tokio::time::sleep(Duration::from_millis(millis)).await;
            self.status.update(&Status::Ready);
        }
    }

    /// Show a transient error, reverting to ready unless listening resumed
    fn report_error(&self, message: &str) {
        self.status.update(&Status::Error(message.to_string()));

        let status = Arc::clone(&self.status);
        let listening = Arc::clone(&self.listening);
        tokio::spawn(async move {
            tokio::time::sleep(ERROR_DISPLAY).await;
            if !listening.load(Ordering::SeqCst) {
                status.update(&Status::Ready);
            }
        });
    }

    /// Handle a recognizer failure mid-listen
    fn capture_error(&mut self, error: &Error) {
        tracing::error!(error = %error, "recognition failed");
        self.listening.store(false, Ordering::SeqCst);
        self.capture.stop();
        self.report_error("Error during speech recognition");
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }
}

impl Session<Recognizer> {
    /// Drive the interactive loop until quit or Ctrl+C
    ///
    /// Blank input or `start` begins listening, `stop` cancels it, and any
    /// other line is treated as a typed utterance so the conversation works
    /// without a microphone.
    ///
    /// # Errors
    ///
    /// Returns error when reading standard input fails.
    #[allow(clippy::future_not_send)]
    pub async fn run(&mut self) -> Result<()> {
        println!("Press Enter to start listening, type to chat, 'quit' to exit.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut tick = tokio::time::interval(POLL_INTERVAL);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match line.trim() {
                        "" | "start" => self.start(),
                        "stop" => self.stop(),
                        "quit" | "exit" => break,
                        text => self.handle_utterance(text).await,
                    }
                }
                _ = tick.tick() => {
                    if self.listening.load(Ordering::SeqCst) {
                        match self.capture.poll().await {
                            Ok(Some(utterance)) => self.handle_utterance(&utterance).await,
                            Ok(None) => {}
                            Err(e) => self.capture_error(&e),
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("shutting down");
                    break;
                }
            }
        }

        self.stop();
        Ok(())
    }
}
