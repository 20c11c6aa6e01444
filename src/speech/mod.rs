//! Speech side channels: capture (speech-to-text) and synthesis (text-to-speech)
//!
//! Both sit behind narrow capability traits so the adapters stay
//! host-agnostic and testable without audio hardware.

mod capture;
mod synthesis;

pub use capture::{CaptureState, RecognitionEvent, RecognizerEngine, SpeechCapture};
pub use synthesis::{
    decode_pcm16, samples_to_wav, AudioSink, CpalSink, SinkFactory, Speaker, TTS_SAMPLE_RATE,
};
