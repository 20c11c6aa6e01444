//! Speech adapter integration tests
//!
//! Drives the capture state machine and synthesis decode paths with fake
//! engines and sinks; no audio hardware or network required.

use std::sync::{Arc, Mutex};

use lumen_assist::speech::{
    decode_pcm16, samples_to_wav, CaptureState, RecognitionEvent, RecognizerEngine,
    SpeechCapture, TTS_SAMPLE_RATE,
};
use lumen_assist::{Language, Result};

/// Records every start locale and counts stops
#[derive(Default)]
struct FakeEngine {
    starts: Arc<Mutex<Vec<String>>>,
    stops: Arc<Mutex<usize>>,
}

impl FakeEngine {
    fn shared() -> (Box<Self>, Arc<Mutex<Vec<String>>>, Arc<Mutex<usize>>) {
        let engine = Self::default();
        let starts = Arc::clone(&engine.starts);
        let stops = Arc::clone(&engine.stops);
        (Box::new(engine), starts, stops)
    }
}

impl RecognizerEngine for FakeEngine {
    fn start(&mut self, locale: &str) -> Result<()> {
        self.starts.lock().unwrap().push(locale.to_string());
        Ok(())
    }

    fn stop(&mut self) {
        *self.stops.lock().unwrap() += 1;
    }
}

/// An engine that refuses to start
struct BrokenEngine;

impl RecognizerEngine for BrokenEngine {
    fn start(&mut self, _locale: &str) -> Result<()> {
        Err(lumen_assist::Error::Capture("device busy".to_string()))
    }

    fn stop(&mut self) {}
}

#[test]
fn start_then_stop_without_events_leaves_transcript_empty() {
    let (engine, _, stops) = FakeEngine::shared();
    let mut capture = SpeechCapture::new(Some(engine));

    capture.start_listening();
    assert!(capture.is_listening());

    capture.stop_listening();
    assert_eq!(capture.state(), CaptureState::Idle);
    assert_eq!(capture.transcript(), "");
    assert_eq!(*stops.lock().unwrap(), 1);
}

#[test]
fn final_fragments_accumulate_across_one_session() {
    let (engine, _, _) = FakeEngine::shared();
    let mut capture = SpeechCapture::new(Some(engine));

    capture.start_listening();
    capture.handle_event(RecognitionEvent::Final("hello".to_string()));
    capture.handle_event(RecognitionEvent::Interim("wor".to_string()));
    capture.handle_event(RecognitionEvent::Final("world".to_string()));

    assert_eq!(capture.transcript(), "hello world");
}

#[test]
fn new_session_resets_the_transcript() {
    let (engine, _, _) = FakeEngine::shared();
    let mut capture = SpeechCapture::new(Some(engine));

    capture.start_listening();
    capture.handle_event(RecognitionEvent::Final("first".to_string()));
    capture.stop_listening();

    capture.start_listening();
    assert_eq!(capture.transcript(), "");
    capture.handle_event(RecognitionEvent::Final("second".to_string()));
    assert_eq!(capture.transcript(), "second");
}

#[test]
fn engine_driven_end_is_equivalent_to_stop() {
    let (engine, _, _) = FakeEngine::shared();
    let mut capture = SpeechCapture::new(Some(engine));

    capture.start_listening();
    capture.handle_event(RecognitionEvent::Final("only this".to_string()));
    capture.handle_event(RecognitionEvent::Ended);

    assert!(!capture.is_listening());
    assert_eq!(capture.transcript(), "only this");

    // Events after the session ended are ignored
    capture.handle_event(RecognitionEvent::Final("stale".to_string()));
    assert_eq!(capture.transcript(), "only this");
}

#[test]
fn language_change_takes_effect_on_next_session() {
    let (engine, starts, _) = FakeEngine::shared();
    let mut capture = SpeechCapture::new(Some(engine));

    capture.start_listening();
    capture.set_language(Language::Hindi);
    // Active session keeps the locale it started with
    assert!(capture.is_listening());
    capture.stop_listening();

    capture.start_listening();
    let locales = starts.lock().unwrap();
    assert_eq!(locales.as_slice(), ["en-US", "hi-IN"]);
}

#[test]
fn start_while_listening_is_a_no_op() {
    let (engine, starts, _) = FakeEngine::shared();
    let mut capture = SpeechCapture::new(Some(engine));

    capture.start_listening();
    capture.handle_event(RecognitionEvent::Final("kept".to_string()));
    capture.start_listening();

    assert_eq!(capture.transcript(), "kept");
    assert_eq!(starts.lock().unwrap().len(), 1);
}

#[test]
fn failed_engine_start_records_error_and_stays_idle() {
    let mut capture = SpeechCapture::new(Some(Box::new(BrokenEngine)));

    capture.start_listening();
    assert_eq!(capture.state(), CaptureState::Idle);
    assert!(capture.error().is_some());
}

#[test]
fn pcm_roundtrips_through_wav() {
    // i16 0x2000 = 8192 -> 0.25
    let pcm: Vec<u8> = std::iter::repeat_n([0x00u8, 0x20u8], 480)
        .flatten()
        .collect();
    let samples = decode_pcm16(&pcm);
    assert_eq!(samples.len(), 480);
    assert!((samples[0] - 0.25).abs() < 0.001);

    let wav = samples_to_wav(&samples, TTS_SAMPLE_RATE).unwrap();
    let mut reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
    assert_eq!(reader.spec().sample_rate, TTS_SAMPLE_RATE);
    assert_eq!(reader.spec().channels, 1);

    let restored: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(restored.len(), 480);
    assert!((i32::from(restored[0]) - 8192).abs() <= 1);
}
