//! Configuration for Lumen Assist

use crate::{Error, Result};

/// Environment variable holding the generative API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Lumen Assist configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Generative API key (required for all generation paths)
    pub api_key: String,

    /// Model for standard text generation tasks
    pub text_model: String,

    /// Model for learning roadmap generation (longer, structured output)
    pub roadmap_model: String,

    /// Text-to-speech configuration
    pub tts: TtsConfig,
}

/// Text-to-speech configuration
#[derive(Debug, Clone)]
pub struct TtsConfig {
    /// TTS model identifier
    pub model: String,

    /// Prebuilt voice name
    pub voice: String,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash-preview-tts".to_string(),
            voice: "Kore".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the API key env var is missing or empty.
    /// A missing key is fatal for every path that talks to the generative
    /// API, so this is checked once at startup.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::Config(format!("{API_KEY_ENV} environment variable not set"))
            })?;

        Ok(Self::with_api_key(api_key))
    }

    /// Build a configuration with default models for the given key
    #[must_use]
    pub fn with_api_key(api_key: String) -> Self {
        Self {
            api_key,
            text_model: "gemini-2.5-flash".to_string(),
            roadmap_model: "gemini-2.5-pro".to_string(),
            tts: TtsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_flash_for_text_and_pro_for_roadmaps() {
        let config = Config::with_api_key("k".to_string());
        assert_eq!(config.text_model, "gemini-2.5-flash");
        assert_eq!(config.roadmap_model, "gemini-2.5-pro");
        assert_eq!(config.tts.voice, "Kore");
    }
}
