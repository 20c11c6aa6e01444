//! Supported human languages and their speech locale codes

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Languages supported for translation and speech capture
///
/// Each language maps to exactly one BCP-47 speech locale code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Hindi,
    Telugu,
    Urdu,
    Tamil,
    Kannada,
    Spanish,
    French,
    German,
    Japanese,
    Russian,
}

/// All supported languages, in display order
pub const ALL_LANGUAGES: [Language; 11] = [
    Language::English,
    Language::Hindi,
    Language::Telugu,
    Language::Urdu,
    Language::Tamil,
    Language::Kannada,
    Language::Spanish,
    Language::French,
    Language::German,
    Language::Japanese,
    Language::Russian,
];

impl Language {
    /// Speech locale code for this language
    #[must_use]
    pub const fn locale_code(self) -> &'static str {
        match self {
            Self::English => "en-US",
            Self::Hindi => "hi-IN",
            Self::Telugu => "te-IN",
            Self::Urdu => "ur-PK",
            Self::Tamil => "ta-IN",
            Self::Kannada => "kn-IN",
            Self::Spanish => "es-ES",
            Self::French => "fr-FR",
            Self::German => "de-DE",
            Self::Japanese => "ja-JP",
            Self::Russian => "ru-RU",
        }
    }

    /// English name of this language, as used in prompts
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "Hindi",
            Self::Telugu => "Telugu",
            Self::Urdu => "Urdu",
            Self::Tamil => "Tamil",
            Self::Kannada => "Kannada",
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::German => "German",
            Self::Japanese => "Japanese",
            Self::Russian => "Russian",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_LANGUAGES
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidRequest(format!("unknown language: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_language_has_a_unique_locale_code() {
        let codes: HashSet<&str> = ALL_LANGUAGES.iter().map(|l| l.locale_code()).collect();
        assert_eq!(codes.len(), ALL_LANGUAGES.len());
        assert!(codes.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("hindi".parse::<Language>().unwrap(), Language::Hindi);
        assert_eq!(" Japanese ".parse::<Language>().unwrap(), Language::Japanese);
        assert!("Klingon".parse::<Language>().is_err());
    }
}
