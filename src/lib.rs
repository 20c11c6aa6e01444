//! Lumen Assist - AI-assisted productivity toolkit
//!
//! This library is the prompt-dispatch and result-normalization layer
//! behind the Lumen front ends:
//! - Prompt builders: one instruction string per task kind
//! - Generation dispatch against the hosted generative API, with a
//!   task-shape-correct fallback on every failure
//! - Speech capture (host-agnostic state machine) and speech synthesis
//!   (TTS round trip, PCM decode, playback)
//! - A single multi-turn chat session for the assistant panel
//! - Local plain-text export of results
//!
//! All state is process-lifetime; nothing is persisted.

pub mod chat;
pub mod config;
pub mod error;
pub mod export;
pub mod generate;
pub mod language;
pub mod prompt;
pub mod speech;
pub mod task;

pub use chat::{ChatMessage, ChatRole, ChatSession};
pub use config::Config;
pub use error::{Error, Result};
pub use export::{export_filename, export_text};
pub use generate::{fallback, normalize, parse_structured, GenerationClient};
pub use language::{Language, ALL_LANGUAGES};
pub use prompt::build_prompt;
pub use speech::{SpeechCapture, Speaker};
pub use task::{
    ApologyTone, Audience, EmailTone, ExcuseMode, GenerationRequest, GenerationResult,
    LetterTone, ResponseShape, StructuredResult, SummaryLength, TaskKind,
};
