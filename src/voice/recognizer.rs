//! Continuous speech recognition
//!
//! Combines microphone capture, utterance segmentation, and transcription
//! into a single poll-driven recognizer.

use crate::{Result, voice};

use super::capture::AudioCapture;
use super::segmenter::UtteranceSegmenter;
use super::stt::Transcriber;

/// Start/stop control over an audio capture source
///
/// Lets the session drive a real microphone or a stand-in with the same code.
pub trait CaptureControl {
    /// Begin capturing audio
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Unsupported`] when no capture device exists,
    /// or [`crate::Error::Capture`] on a transient device failure.
    fn start(&mut self) -> Result<()>;

    /// Stop capturing and discard buffered audio
    fn stop(&mut self);

    /// Whether capture is currently active
    fn is_running(&self) -> bool;
}

/// Buffer access the recognizer needs on top of start/stop control
pub trait CaptureSource: CaptureControl {
    /// Samples captured since the last call
    fn take_buffer(&self) -> Vec<f32>;

    /// Whether the stream reported an error since the last start
    fn has_failed(&self) -> bool;
}

impl CaptureControl for AudioCapture {
    fn start(&mut self) -> Result<()> {
        Self::start(self)
    }

    fn stop(&mut self) {
        Self::stop(self);
    }

    fn is_running(&self) -> bool {
        self.is_capturing()
    }
}

impl CaptureSource for AudioCapture {
    fn take_buffer(&self) -> Vec<f32> {
        Self::take_buffer(self)
    }

    fn has_failed(&self) -> bool {
        Self::has_failed(self)
    }
}

/// Turns a live microphone into a stream of transcribed utterances
pub struct Recognizer<S: CaptureSource = AudioCapture> {
    capture: S,
    segmenter: UtteranceSegmenter,
    transcriber: Box<dyn Transcriber>,
}

impl Recognizer {
    #[must_use]
    pub fn new(transcriber: Box<dyn Transcriber>) -> Self {
        Self::with_capture(AudioCapture::new(), transcriber)
    }
}

impl<S: CaptureSource> Recognizer<S> {
    /// Build a recognizer over an explicit capture source
    pub fn with_capture(capture: S, transcriber: Box<dyn Transcriber>) -> Self {
        Self {
            capture,
            segmenter: UtteranceSegmenter::new(),
            transcriber,
        }
    }

    /// Drain captured audio and return a transcribed utterance once one
    /// completes
    ///
    /// When the device errors mid-capture the stream is restarted in place,
    /// so a transient failure costs at most one utterance.
    ///
    /// # Errors
    ///
    /// Returns error when the restart or the transcription request fails.
    pub async fn poll(&mut self) -> Result<Option<String>> {
        if self.capture.has_failed() && self.capture.is_running() {
            tracing::debug!("capture ended, restarting");
            self.capture.stop();
            self.segmenter.reset();
            self.capture.start()?;
            return Ok(None);
        }

        let samples = self.capture.take_buffer();
        if samples.is_empty() {
            return Ok(None);
        }

        let Some(utterance) = self.segmenter.push(&samples) else {
            return Ok(None);
        };

        let wav = voice::samples_to_wav(&utterance, voice::SAMPLE_RATE)?;
        let text = self.transcriber.transcribe(wav).await?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        tracing::info!(text = %text, "utterance recognized");
        Ok(Some(text.to_string()))
    }
}

impl<S: CaptureSource> CaptureControl for Recognizer<S> {
    fn start(&mut self) -> Result<()> {
        self.segmenter.reset();
        self.capture.start()
    }

    fn stop(&mut self) {
        self.capture.stop();
        self.segmenter.reset();
    }

    fn is_running(&self) -> bool {
        self.capture.is_running()
    }
}
