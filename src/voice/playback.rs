//! Audio playback to speakers

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, StreamConfig};

use crate::{Error, Result};

/// Sample rate for playback (matches common TTS output)
const PLAYBACK_SAMPLE_RATE: u32 = 24000;

/// Destination for synthesized speech
#[async_trait]
pub trait AudioSink: Send {
    /// Play MP3-encoded audio to completion
    ///
    /// # Errors
    ///
    /// Returns error if decoding or playback fails
    async fn play_mp3(&mut self, mp3_data: &[u8]) -> Result<()>;
}

/// Plays audio to the default output device
///
/// The device is resolved lazily at play time, so construction never fails
/// and a device plugged in later is picked up.
pub struct AudioPlayback;

impl AudioPlayback {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Play audio samples (f32 format)
    ///
    /// # Errors
    ///
    /// Returns error if playback fails
    #[allow(clippy::unused_async)]
    pub async fn play(&mut self, samples: Vec<f32>) -> Result<()> {
        play_samples_blocking(&samples)
    }
}

impl Default for AudioPlayback {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioSink for AudioPlayback {
    #[allow(clippy::unused_async)]
    async fn play_mp3(&mut self, mp3_data: &[u8]) -> Result<()> {
        let samples = decode_mp3(mp3_data)?;
        play_samples_blocking(&samples)
    }
}

/// Resolve the default output device and a config at the playback rate
fn open_output() -> Result<(Device, StreamConfig)> {
    let host = cpal::default_host();

    let device = host
        .default_output_device()
        .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

    let supported_config = device
        .supported_output_configs()
        .map_err(|e| Error::Audio(e.to_string()))?
        .find(|c| {
            c.channels() == 1
                && c.min_sample_rate() <= SampleRate(PLAYBACK_SAMPLE_RATE)
                && c.max_sample_rate() >= SampleRate(PLAYBACK_SAMPLE_RATE)
        })
        .or_else(|| {
            // Fallback: try stereo
            device.supported_output_configs().ok()?.find(|c| {
                c.channels() == 2
                    && c.min_sample_rate() <= SampleRate(PLAYBACK_SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(PLAYBACK_SAMPLE_RATE)
            })
        })
        .ok_or_else(|| Error::Audio("no suitable output config found".to_string()))?;

    let config = supported_config
        .with_sample_rate(SampleRate(PLAYBACK_SAMPLE_RATE))
        .config();

    tracing::debug!(
        device = device.name().unwrap_or_default(),
        sample_rate = PLAYBACK_SAMPLE_RATE,
        channels = config.channels,
        "audio output opened"
    );

    Ok((device, config))
}

/// Play samples in a blocking manner
fn play_samples_blocking(samples: &[f32]) -> Result<()> {
    if samples.is_empty() {
        return Ok(());
    }

    let (device, config) = open_output()?;
    let channels = config.channels as usize;

    let buffer = Arc::new(samples.to_vec());
    let position = Arc::new(Mutex::new(0usize));
    // Set on end of data AND on stream error, so the wait below always resolves
    let finished = Arc::new(AtomicBool::new(false));

    let buffer_clone = Arc::clone(&buffer);
    let position_clone = Arc::clone(&position);
    let finished_data = Arc::clone(&finished);
    let finished_err = Arc::clone(&finished);

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut pos = position_clone.lock().unwrap();

                for frame in data.chunks_mut(channels) {
                    let sample = if *pos < buffer_clone.len() {
                        buffer_clone[*pos]
                    } else {
                        finished_data.store(true, Ordering::SeqCst);
                        0.0
                    };

                    for out in frame.iter_mut() {
                        *out = sample;
                    }

                    if *pos < buffer_clone.len() {
                        *pos += 1;
                    }
                }
            },
            move |err| {
                tracing::error!(error = %err, "audio playback error");
                finished_err.store(true, Ordering::SeqCst);
            },
            None,
        )
        .map_err(|e| Error::Audio(e.to_string()))?;

    stream.play().map_err(|e| Error::Audio(e.to_string()))?;

    let sample_count = buffer.len();
    let duration_ms = (sample_count as u64 * 1000) / u64::from(PLAYBACK_SAMPLE_RATE);

    // Poll for completion with timeout
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(duration_ms + 500);

    while !finished.load(Ordering::SeqCst) {
        if start.elapsed() > timeout {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(50));
    }

    // Small delay to ensure audio finishes
    std::thread::sleep(std::time::Duration::from_millis(100));

    drop(stream);
    tracing::debug!(samples = sample_count, "playback complete");

    Ok(())
}

/// Decode MP3 bytes to mono f32 samples, folding stereo down by averaging
fn decode_mp3(mp3_data: &[u8]) -> Result<Vec<f32>> {
    const SCALE: f32 = 1.0 / 32768.0;

    let mut decoder = minimp3::Decoder::new(Cursor::new(mp3_data));
    let mut samples = Vec::new();

    loop {
        let frame = match decoder.next_frame() {
            Ok(frame) => frame,
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::Audio(format!("MP3 decode error: {e}"))),
        };

        if frame.channels == 2 {
            samples.extend(
                frame
                    .data
                    .chunks_exact(2)
                    .map(|pair| f32::midpoint(f32::from(pair[0]), f32::from(pair[1])) * SCALE),
            );
        } else {
            samples.extend(frame.data.iter().map(|&s| f32::from(s) * SCALE));
        }
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_garbage() {
        // minimp3 skips unsyncable bytes and reaches EOF with no frames
        let samples = decode_mp3(&[0u8; 64]).unwrap();
        assert!(samples.is_empty());
    }
}
