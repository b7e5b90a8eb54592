//! Conversation loop tests without audio hardware or network

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use chatterbox::responder::CANNED_REPLIES;
use chatterbox::voice::{AudioSink, CaptureControl, Synthesizer};
use chatterbox::{Error, Result, Session, Speaker, Status, StatusSink};

/// Capture stand-in with scriptable start failures
#[derive(Default)]
struct StubCapture {
    running: bool,
    fail_with: Option<Error>,
}

impl CaptureControl for StubCapture {
    fn start(&mut self) -> Result<()> {
        if let Some(err) = self.fail_with.take() {
            return Err(err);
        }
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Records every status transition
#[derive(Default)]
struct RecordingSink {
    updates: Mutex<Vec<Status>>,
}

impl StatusSink for RecordingSink {
    fn update(&self, status: &Status) {
        self.updates.lock().unwrap().push(status.clone());
    }
}

impl RecordingSink {
    fn snapshot(&self) -> Vec<Status> {
        self.updates.lock().unwrap().clone()
    }
}

/// Counts playback calls instead of touching a device
#[derive(Default)]
struct CountingAudio {
    plays: Arc<AtomicUsize>,
}

#[async_trait]
impl AudioSink for CountingAudio {
    async fn play_mp3(&mut self, _mp3_data: &[u8]) -> Result<()> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Synthesizer that always reports an unauthorized response
struct UnauthorizedSynth;

#[async_trait]
impl Synthesizer for UnauthorizedSynth {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        Err(Error::Api {
            status: 401,
            message: "invalid api key".to_string(),
        })
    }
}

/// Synthesizer that hands back fixed bytes
struct FixedSynth;

#[async_trait]
impl Synthesizer for FixedSynth {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        Ok(vec![0xff, 0xfb, 0x90, 0x00])
    }
}

fn session_with(
    capture: StubCapture,
    tts: Option<Box<dyn Synthesizer>>,
) -> (Session<StubCapture>, Arc<RecordingSink>, Arc<AtomicUsize>) {
    let sink = Arc::new(RecordingSink::default());
    let plays = Arc::new(AtomicUsize::new(0));
    let audio = CountingAudio {
        plays: Arc::clone(&plays),
    };
    let session = Session::new(
        capture,
        tts,
        Box::new(audio),
        Arc::clone(&sink) as Arc<dyn StatusSink>,
        false,
    );
    (session, sink, plays)
}

fn session_without_credential(
    capture: StubCapture,
) -> (Session<StubCapture>, Arc<RecordingSink>, Arc<AtomicUsize>) {
    session_with(capture, None)
}

#[tokio::test(start_paused = true)]
async fn utterance_flows_through_reply_and_simulated_speech() {
    let (mut session, sink, plays) = session_without_credential(StubCapture::default());

    session.start();
    assert!(session.is_listening());

    session.handle_utterance("hello").await;

    let entries = session.transcript().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].speaker, Speaker::User);
    assert_eq!(entries[0].text, "hello");
    assert_eq!(entries[1].speaker, Speaker::Assistant);
    assert!(CANNED_REPLIES.contains(&entries[1].text.as_str()));

    let statuses = sink.snapshot();
    assert_eq!(
        statuses,
        vec![
            Status::Ready,
            Status::Listening,
            Status::Processing,
            Status::Speaking,
            Status::Ready,
        ]
    );

    // No credential, so nothing reaches the speaker
    assert_eq!(plays.load(Ordering::SeqCst), 0);
    assert!(!session.is_listening());
}

#[tokio::test(start_paused = true)]
async fn unsupported_capture_is_a_permanent_error() {
    let capture = StubCapture {
        fail_with: Some(Error::Unsupported("no input device".to_string())),
        ..StubCapture::default()
    };
    let (mut session, sink, _) = session_without_credential(capture);

    session.start();
    assert!(!session.is_listening());

    // A later start must not retry the device
    session.start();

    let statuses = sink.snapshot();
    assert_eq!(
        statuses,
        vec![
            Status::Ready,
            Status::Error("Speech recognition not supported".to_string()),
            Status::Error("Speech recognition not supported".to_string()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn transient_start_failure_reverts_to_ready() {
    let capture = StubCapture {
        fail_with: Some(Error::Capture("device busy".to_string())),
        ..StubCapture::default()
    };
    let (mut session, sink, _) = session_without_credential(capture);

    session.start();
    assert!(!session.is_listening());
    assert_eq!(
        sink.snapshot().last(),
        Some(&Status::Error("Error starting microphone".to_string()))
    );

    // Error display times out back to ready
    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
    assert_eq!(sink.snapshot().last(), Some(&Status::Ready));

    // The device recovered, listening works again
    session.start();
    assert!(session.is_listening());
    assert_eq!(sink.snapshot().last(), Some(&Status::Listening));
}

#[tokio::test(start_paused = true)]
async fn stop_while_idle_is_a_no_op() {
    let (mut session, sink, _) = session_without_credential(StubCapture::default());

    session.stop();
    assert_eq!(sink.snapshot(), vec![Status::Ready]);
}

#[tokio::test(start_paused = true)]
async fn restart_after_stop() {
    let (mut session, sink, _) = session_without_credential(StubCapture::default());

    session.start();
    session.stop();
    session.start();

    assert!(session.is_listening());
    assert_eq!(
        sink.snapshot(),
        vec![
            Status::Ready,
            Status::Listening,
            Status::Ready,
            Status::Listening,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn synthesized_reply_reaches_the_speaker() {
    let (mut session, sink, plays) =
        session_with(StubCapture::default(), Some(Box::new(FixedSynth)));

    session.handle_utterance("hello").await;

    assert_eq!(plays.load(Ordering::SeqCst), 1);
    assert_eq!(sink.snapshot().last(), Some(&Status::Ready));
}

#[tokio::test(start_paused = true)]
async fn unauthorized_synthesis_shows_error_then_reverts() {
    let (mut session, sink, plays) =
        session_with(StubCapture::default(), Some(Box::new(UnauthorizedSynth)));

    session.handle_utterance("hello").await;

    // No audio played, error shown in place of speaking
    assert_eq!(plays.load(Ordering::SeqCst), 0);
    assert_eq!(
        sink.snapshot().last(),
        Some(&Status::Error("Speech synthesis failed".to_string()))
    );

    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
    assert_eq!(sink.snapshot().last(), Some(&Status::Ready));
}

#[tokio::test(start_paused = true)]
async fn simulated_speaking_scales_with_reply_length() {
    let (mut session, _, _) = session_without_credential(StubCapture::default());

    let before = tokio::time::Instant::now();
    session.handle_utterance("hi").await;
    let elapsed = before.elapsed();

    let reply_len = session.transcript().entries()[1].text.len() as u64;
    // 1s response delay plus 50ms per reply character
    let expected = std::time::Duration::from_millis(1000 + reply_len * 50);
    assert!(elapsed >= expected);
}
