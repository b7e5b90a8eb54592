//! Voice pipeline tests that run without audio hardware

use chatterbox::voice::{SAMPLE_RATE, UtteranceSegmenter, samples_to_wav};

/// Generate a sine wave at the given frequency and amplitude
#[allow(clippy::cast_precision_loss)]
fn sine(frequency: f32, amplitude: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * amplitude
        })
        .collect()
}

fn silence(num_samples: usize) -> Vec<f32> {
    vec![0.0; num_samples]
}

#[test]
fn speech_followed_by_silence_finalizes_one_utterance() {
    let mut segmenter = UtteranceSegmenter::new();

    // Half a second of loud speech
    assert!(segmenter.push(&sine(440.0, 0.5, 8000)).is_none());
    assert!(segmenter.in_speech());

    // Enough trailing silence to close the utterance
    let utterance = segmenter.push(&silence(10000));
    let utterance = utterance.expect("utterance should finalize after silence");
    assert!(utterance.len() >= 8000);
    assert!(!segmenter.in_speech());
}

#[test]
fn quiet_audio_never_starts_an_utterance() {
    let mut segmenter = UtteranceSegmenter::new();

    assert!(segmenter.push(&sine(440.0, 0.005, 16000)).is_none());
    assert!(!segmenter.in_speech());
    assert!(segmenter.push(&silence(16000)).is_none());
}

#[test]
fn short_blip_is_discarded() {
    let mut segmenter = UtteranceSegmenter::new();

    // Too short to count as speech (under the minimum utterance length)
    segmenter.push(&sine(440.0, 0.5, 1000));
    assert!(segmenter.push(&silence(20000)).is_none());
    assert!(!segmenter.in_speech());
}

#[test]
fn utterance_accumulates_across_pushes() {
    let mut segmenter = UtteranceSegmenter::new();

    for _ in 0..4 {
        assert!(segmenter.push(&sine(330.0, 0.4, 2000)).is_none());
    }
    let utterance = segmenter.push(&silence(10000)).expect("utterance");
    assert!(utterance.len() >= 8000);
}

#[test]
fn reset_discards_partial_speech() {
    let mut segmenter = UtteranceSegmenter::new();

    segmenter.push(&sine(440.0, 0.5, 8000));
    assert!(segmenter.in_speech());

    segmenter.reset();
    assert!(!segmenter.in_speech());
    assert!(segmenter.push(&silence(10000)).is_none());
}

#[test]
fn wav_encoding_produces_riff_header() {
    let samples = sine(440.0, 0.5, 1600);
    let wav = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[8..12], b"WAVE");
}

#[test]
fn wav_encoding_roundtrips_sample_count() {
    let samples = sine(220.0, 0.3, 3200);
    let wav = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    let reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.channels, 1);
    assert_eq!(reader.len(), 3200);
}

#[test]
fn empty_input_encodes_to_valid_wav() {
    let wav = samples_to_wav(&[], SAMPLE_RATE).unwrap();
    let reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
    assert_eq!(reader.len(), 0);
}
