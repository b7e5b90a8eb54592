//! Utterance segmentation
//!
//! Splits a continuous microphone stream into finalized utterances using
//! RMS energy: speech starts when energy crosses a threshold, and an
//! utterance is finalized after enough trailing silence.

/// Minimum audio energy threshold to consider speech
const ENERGY_THRESHOLD: f32 = 0.03;

/// Minimum duration of speech to finalize (in samples at 16kHz)
const MIN_SPEECH_SAMPLES: usize = 4_800; // 0.3 seconds

/// Silence duration to consider end of utterance (in samples)
const SILENCE_SAMPLES: usize = 8_000; // 0.5 seconds

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentState {
    /// Waiting for speech
    Idle,
    /// Accumulating a speech segment
    Speech,
}

/// Segments a sample stream into utterances
#[derive(Debug)]
pub struct UtteranceSegmenter {
    state: SegmentState,
    buffer: Vec<f32>,
    silence_counter: usize,
}

impl Default for UtteranceSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl UtteranceSegmenter {
    /// Create a segmenter in the idle state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SegmentState::Idle,
            buffer: Vec::new(),
            silence_counter: 0,
        }
    }

    /// Feed captured samples. Returns a finalized utterance's samples when
    /// enough speech has been followed by enough silence.
    pub fn push(&mut self, samples: &[f32]) -> Option<Vec<f32>> {
        let energy = calculate_energy(samples);
        let is_speech = energy > ENERGY_THRESHOLD;

        match self.state {
            SegmentState::Idle => {
                if is_speech {
                    self.state = SegmentState::Speech;
                    self.buffer.clear();
                    self.buffer.extend_from_slice(samples);
                    self.silence_counter = 0;
                    tracing::trace!(energy, "speech started");
                }
                None
            }
            SegmentState::Speech => {
                self.buffer.extend_from_slice(samples);

                if is_speech {
                    self.silence_counter = 0;
                } else {
                    self.silence_counter += samples.len();
                }

                if self.silence_counter > SILENCE_SAMPLES {
                    // Trailing silence sits in the buffer too, so measure
                    // speech up to the last speech chunk
                    let speech_len = self.buffer.len().saturating_sub(self.silence_counter);
                    if speech_len > MIN_SPEECH_SAMPLES {
                        tracing::debug!(samples = self.buffer.len(), "utterance finalized");
                        self.state = SegmentState::Idle;
                        self.silence_counter = 0;
                        return Some(std::mem::take(&mut self.buffer));
                    }

                    // A blip too short to be speech: discard it
                    tracing::trace!(speech_len, "segment too short, resetting");
                    self.reset();
                }

                None
            }
        }
    }

    /// Whether a speech segment is currently being accumulated
    #[must_use]
    pub fn in_speech(&self) -> bool {
        self.state == SegmentState::Speech
    }

    /// Discard any accumulated samples and return to idle
    pub fn reset(&mut self) {
        self.state = SegmentState::Idle;
        self.buffer.clear();
        self.silence_counter = 0;
    }
}

/// Calculate RMS energy of audio samples
#[allow(clippy::cast_precision_loss)]
fn calculate_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}
