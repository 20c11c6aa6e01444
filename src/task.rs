//! Task kinds, request parameters, and result shapes

use std::fmt;
use std::str::FromStr;

use crate::language::Language;
use crate::{Error, Result};

/// The generation tasks the app offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Excuse,
    Apology,
    Email,
    Letter,
    Summary,
    Roadmap,
    MedicalInfo,
    Translate,
}

impl TaskKind {
    /// Short label used in logs and fallback messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excuse => "excuse",
            Self::Apology => "apology",
            Self::Email => "email",
            Self::Letter => "letter",
            Self::Summary => "summary",
            Self::Roadmap => "roadmap",
            Self::MedicalInfo => "medical-info",
            Self::Translate => "translate",
        }
    }

    /// Result shape this task produces
    #[must_use]
    pub const fn shape(self) -> ResponseShape {
        match self {
            Self::Excuse | Self::Apology => ResponseShape::Structured,
            _ => ResponseShape::Plain,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shape of the result a task produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Free text
    Plain,
    /// Fixed {text, percentage, emoji} object
    Structured,
}

macro_rules! tone_enum {
    ($(#[$doc:meta])* $name:ident { $($variant:ident => $word:literal),+ $(,)? }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Lowercase word interpolated into the prompt
            #[must_use]
            pub const fn word(self) -> &'static str {
                match self {
                    $(Self::$variant => $word,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_lowercase().as_str() {
                    $($word => Ok(Self::$variant),)+
                    other => Err(Error::InvalidRequest(format!(
                        concat!("unknown ", stringify!($name), ": {}"),
                        other
                    ))),
                }
            }
        }
    };
}

tone_enum! {
    /// How an excuse should come across
    ExcuseMode {
        Believable => "believable",
        Funny => "funny",
        Urgent => "urgent",
        Professional => "professional",
    }
}

tone_enum! {
    /// Register of an apology
    ApologyTone {
        Sincere => "sincere",
        Formal => "formal",
        Casual => "casual",
    }
}

tone_enum! {
    /// Register of an email body
    EmailTone {
        Formal => "formal",
        Casual => "casual",
        Friendly => "friendly",
        Urgent => "urgent",
    }
}

tone_enum! {
    /// Register of a letter body
    LetterTone {
        Formal => "formal",
        Informal => "informal",
        Friendly => "friendly",
    }
}

tone_enum! {
    /// Target length for a summary
    SummaryLength {
        Short => "short",
        Medium => "medium",
        Detailed => "detailed",
    }
}

tone_enum! {
    /// Who a medical explanation is written for
    Audience {
        Patient => "patient",
        Student => "student",
    }
}

/// Parameters for one generation call
///
/// Built fresh per user action and immutable once constructed.
#[derive(Debug, Clone)]
pub enum GenerationRequest {
    Excuse {
        situation: String,
        mode: ExcuseMode,
    },
    Apology {
        situation: String,
        tone: ApologyTone,
    },
    Email {
        to: String,
        subject: String,
        points: String,
        tone: EmailTone,
    },
    Letter {
        to: String,
        from: String,
        points: String,
        tone: LetterTone,
    },
    Summary {
        text: String,
        length: SummaryLength,
    },
    Roadmap {
        topic: String,
    },
    MedicalInfo {
        condition: String,
        audience: Audience,
    },
    Translate {
        text: String,
        from: Language,
        to: Language,
    },
}

impl GenerationRequest {
    /// Which task this request belongs to
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        match self {
            Self::Excuse { .. } => TaskKind::Excuse,
            Self::Apology { .. } => TaskKind::Apology,
            Self::Email { .. } => TaskKind::Email,
            Self::Letter { .. } => TaskKind::Letter,
            Self::Summary { .. } => TaskKind::Summary,
            Self::Roadmap { .. } => TaskKind::Roadmap,
            Self::MedicalInfo { .. } => TaskKind::MedicalInfo,
            Self::Translate { .. } => TaskKind::Translate,
        }
    }

    /// Reject empty required fields before any prompt is built
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRequest` naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        let check = |field: &str, value: &str| -> Result<()> {
            if value.trim().is_empty() {
                return Err(Error::InvalidRequest(format!(
                    "{} requires a non-empty {field}",
                    self.kind()
                )));
            }
            Ok(())
        };

        match self {
            Self::Excuse { situation, .. } | Self::Apology { situation, .. } => {
                check("situation", situation)
            }
            Self::Email {
                to, subject, points, ..
            } => {
                check("recipient", to)?;
                check("subject", subject)?;
                check("points", points)
            }
            Self::Letter {
                to, from, points, ..
            } => {
                check("recipient", to)?;
                check("sender", from)?;
                check("points", points)
            }
            Self::Summary { text, .. } | Self::Translate { text, .. } => check("text", text),
            Self::Roadmap { topic } => check("topic", topic),
            Self::MedicalInfo { condition, .. } => check("condition", condition),
        }
    }
}

/// A successful or fallback generation outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    /// Free-text result
    Plain(String),
    /// Scored result for excuse and apology tasks
    Structured(StructuredResult),
}

impl GenerationResult {
    /// The displayable text, regardless of shape
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Structured(s) => &s.text,
        }
    }
}

/// The {text, percentage, emoji} shape used by excuse and apology tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredResult {
    /// Generated content
    pub text: String,
    /// Believability or sincerity score, always within 0..=100
    pub percentage: u8,
    /// Single emoji matching the tone of the content
    pub emoji: String,
}
