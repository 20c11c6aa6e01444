//! Speech capture state machine
//!
//! The platform recognizer sits behind [`RecognizerEngine`]; the adapter
//! owns the listening lifecycle and the accumulating transcript, and stays
//! host-agnostic so it can be driven by a fake engine in tests.

use crate::language::Language;
use crate::Result;

/// State of the capture adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Not capturing; a new session may start
    Idle,
    /// Continuous capture in progress
    Listening,
    /// Platform lacks speech recognition; start requests are no-ops
    Unsupported,
}

/// Events emitted by the platform recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Partial hypothesis; discarded
    Interim(String),
    /// Finalized fragment; appended to the transcript
    Final(String),
    /// Engine-driven end of capture (e.g. silence timeout)
    Ended,
    /// Engine-reported error; capture ends
    Error(String),
}

/// Narrow capability interface over the platform speech recognizer
///
/// Implementations deliver [`RecognitionEvent`]s back to the adapter via
/// [`SpeechCapture::handle_event`]. A locale change requires a fresh
/// `start`, so an active session keeps the locale it started with.
pub trait RecognizerEngine: Send {
    /// Begin continuous capture with interim results enabled
    ///
    /// # Errors
    ///
    /// Returns error if the engine cannot start.
    fn start(&mut self, locale: &str) -> Result<()>;

    /// End capture; no further events after the engine acknowledges
    fn stop(&mut self);
}

/// Captures speech into an accumulating transcript
pub struct SpeechCapture {
    engine: Option<Box<dyn RecognizerEngine>>,
    state: CaptureState,
    transcript: String,
    language: Language,
    error: Option<String>,
}

impl SpeechCapture {
    /// Create a capture adapter over the platform engine
    ///
    /// Pass `None` when the platform lacks speech recognition; the adapter
    /// then stays in [`CaptureState::Unsupported`] with a recorded error.
    #[must_use]
    pub fn new(engine: Option<Box<dyn RecognizerEngine>>) -> Self {
        let (state, error) = if engine.is_some() {
            (CaptureState::Idle, None)
        } else {
            tracing::warn!("speech recognition unavailable on this platform");
            (
                CaptureState::Unsupported,
                Some("Speech recognition is not supported on this platform.".to_string()),
            )
        };

        Self {
            engine,
            state,
            transcript: String::new(),
            language: Language::English,
            error,
        }
    }

    /// Start a new listening session
    ///
    /// Valid only from idle: clears the prior transcript and recorded
    /// error, then starts the engine with the current locale. A no-op when
    /// unsupported or already listening.
    pub fn start_listening(&mut self) {
        if self.state != CaptureState::Idle {
            return;
        }

        self.transcript.clear();
        self.error = None;

        let locale = self.language.locale_code();
        if let Some(engine) = &mut self.engine {
            match engine.start(locale) {
                Ok(()) => {
                    self.state = CaptureState::Listening;
                    tracing::debug!(locale, "listening started");
                }
                Err(e) => {
                    tracing::error!(error = %e, "recognizer failed to start");
                    self.error = Some(e.to_string());
                }
            }
        }
    }

    /// End the current listening session
    ///
    /// Valid only while listening; otherwise a no-op.
    pub fn stop_listening(&mut self) {
        if self.state != CaptureState::Listening {
            return;
        }

        if let Some(engine) = &mut self.engine {
            engine.stop();
        }
        self.state = CaptureState::Idle;
        tracing::debug!(transcript_len = self.transcript.len(), "listening stopped");
    }

    /// Deliver one recognizer event to the adapter
    pub fn handle_event(&mut self, event: RecognitionEvent) {
        if self.state != CaptureState::Listening {
            return;
        }

        match event {
            RecognitionEvent::Interim(_) => {}
            RecognitionEvent::Final(fragment) => {
                if !fragment.is_empty() {
                    if !self.transcript.is_empty() {
                        self.transcript.push(' ');
                    }
                    self.transcript.push_str(&fragment);
                }
            }
            RecognitionEvent::Ended => {
                // Engine-driven end is equivalent to an explicit stop
                self.state = CaptureState::Idle;
                tracing::debug!("engine ended capture");
            }
            RecognitionEvent::Error(message) => {
                tracing::error!(error = %message, "recognizer error");
                self.error = Some(format!("Speech recognition error: {message}"));
                self.state = CaptureState::Idle;
            }
        }
    }

    /// Change the capture locale
    ///
    /// Takes effect on the next `start_listening`; an active session keeps
    /// the locale it started with.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Accumulated transcript for the current or last session
    #[must_use]
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Whether a capture session is in progress
    ///
    /// Becomes false on explicit stop, engine end, and engine error alike.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.state == CaptureState::Listening
    }

    /// Current adapter state
    #[must_use]
    pub const fn state(&self) -> CaptureState {
        self.state
    }

    /// Currently selected capture language
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Last recorded error message, if any
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopEngine;

    impl RecognizerEngine for NoopEngine {
        fn start(&mut self, _locale: &str) -> Result<()> {
            Ok(())
        }
        fn stop(&mut self) {}
    }

    fn capture() -> SpeechCapture {
        SpeechCapture::new(Some(Box::new(NoopEngine)))
    }

    #[test]
    fn final_fragments_are_space_joined() {
        let mut capture = capture();
        capture.start_listening();
        capture.handle_event(RecognitionEvent::Final("hello".to_string()));
        capture.handle_event(RecognitionEvent::Final("world".to_string()));
        assert_eq!(capture.transcript(), "hello world");
    }

    #[test]
    fn interim_fragments_are_discarded() {
        let mut capture = capture();
        capture.start_listening();
        capture.handle_event(RecognitionEvent::Interim("hel".to_string()));
        capture.handle_event(RecognitionEvent::Final("hello".to_string()));
        assert_eq!(capture.transcript(), "hello");
    }

    #[test]
    fn unsupported_platform_records_error_and_ignores_start() {
        let mut capture = SpeechCapture::new(None);
        assert_eq!(capture.state(), CaptureState::Unsupported);
        assert!(capture.error().is_some());

        capture.start_listening();
        assert_eq!(capture.state(), CaptureState::Unsupported);
        assert!(!capture.is_listening());
    }

    #[test]
    fn engine_error_returns_to_idle_with_message() {
        let mut capture = capture();
        capture.start_listening();
        capture.handle_event(RecognitionEvent::Error("no-speech".to_string()));
        assert_eq!(capture.state(), CaptureState::Idle);
        assert_eq!(
            capture.error(),
            Some("Speech recognition error: no-speech")
        );
    }
}
