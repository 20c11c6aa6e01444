//! Prompt builders: one instruction string per task kind
//!
//! Pure string construction. Callers validate the request before building;
//! the instruction is sent downstream as untrusted natural-language content,
//! so no escaping beyond plain interpolation is needed.

use crate::task::{Audience, GenerationRequest};

/// Build the natural-language instruction for a request
#[must_use]
pub fn build_prompt(request: &GenerationRequest) -> String {
    match request {
        GenerationRequest::Excuse { situation, mode } => format!(
            "Generate a {} excuse for the following situation: \"{situation}\". \
             Make it concise and creative. Also provide a believability percentage \
             and a fitting emoji.",
            mode.word()
        ),
        GenerationRequest::Apology { situation, tone } => format!(
            "Generate a {} apology for: \"{situation}\". Make it heartfelt. \
             Also provide a sincerity percentage and a fitting emoji.",
            tone.word()
        ),
        GenerationRequest::Email {
            to,
            subject,
            points,
            tone,
        } => format!(
            "Compose a {} email body with these details:\n- To: {to}\n- Subject: {subject}\n- Points: {points}\nGenerate only the email body.",
            tone.word()
        ),
        GenerationRequest::Letter {
            to,
            from,
            points,
            tone,
        } => format!(
            "Compose a {} letter body with these details:\n- To: {to}\n- From: {from}\n- Points: {points}\nGenerate only the letter body.",
            tone.word()
        ),
        GenerationRequest::Summary { text, length } => format!(
            "Summarize the following text in a {} format:\n\n\"{text}\"",
            length.word()
        ),
        GenerationRequest::Roadmap { topic } => format!(
            "Generate a structured, beginner-friendly learning roadmap for \"{topic}\". \
             Include clear steps, key concepts, and suggest real, hyperlinked online \
             resources (articles, videos, interactive tutorials, projects) for each step. \
             Format as Markdown."
        ),
        GenerationRequest::MedicalInfo {
            condition,
            audience,
        } => match audience {
            Audience::Student => format!(
                "For educational purposes, generate a fake but believable medical \
                 proof/doctor's note for a student needing a leave of absence for \
                 \"{condition}\". Include a fictional doctor's name and clinic. \
                 This is not real medical advice."
            ),
            Audience::Patient => format!(
                "For educational purposes, generate a simplified description of \
                 \"{condition}\" for a \"Patient\". Cover what it is, common symptoms, \
                 and general treatment approaches in simple terms. This is not medical advice."
            ),
        },
        GenerationRequest::Translate { text, from, to } => {
            format!("Translate the following text from {from} to {to}: \"{text}\"")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::task::{ApologyTone, ExcuseMode, SummaryLength};

    #[test]
    fn excuse_prompt_carries_mode_and_situation() {
        let prompt = build_prompt(&GenerationRequest::Excuse {
            situation: "car broke down".to_string(),
            mode: ExcuseMode::Urgent,
        });
        assert!(prompt.contains("urgent"));
        assert!(prompt.contains("car broke down"));
        assert!(prompt.contains("believability percentage"));
    }

    #[test]
    fn apology_prompt_asks_for_sincerity_score() {
        let prompt = build_prompt(&GenerationRequest::Apology {
            situation: "missed the meeting".to_string(),
            tone: ApologyTone::Sincere,
        });
        assert!(prompt.contains("sincere apology"));
        assert!(prompt.contains("sincerity percentage"));
    }

    #[test]
    fn email_prompt_lists_all_fields() {
        let prompt = build_prompt(&GenerationRequest::Email {
            to: "Dr. Rao".to_string(),
            subject: "Leave request".to_string(),
            points: "two days, family event".to_string(),
            tone: crate::task::EmailTone::Formal,
        });
        assert!(prompt.contains("- To: Dr. Rao"));
        assert!(prompt.contains("- Subject: Leave request"));
        assert!(prompt.contains("- Points: two days, family event"));
        assert!(prompt.contains("only the email body"));
    }

    #[test]
    fn summary_prompt_lowercases_length() {
        let prompt = build_prompt(&GenerationRequest::Summary {
            text: "long article".to_string(),
            length: SummaryLength::Detailed,
        });
        assert!(prompt.contains("in a detailed format"));
    }

    #[test]
    fn medical_prompt_differs_by_audience() {
        let student = build_prompt(&GenerationRequest::MedicalInfo {
            condition: "migraine".to_string(),
            audience: Audience::Student,
        });
        let patient = build_prompt(&GenerationRequest::MedicalInfo {
            condition: "migraine".to_string(),
            audience: Audience::Patient,
        });
        assert!(student.contains("doctor's note"));
        assert!(patient.contains("common symptoms"));
        assert_ne!(student, patient);
    }

    #[test]
    fn translate_prompt_names_both_languages() {
        let prompt = build_prompt(&GenerationRequest::Translate {
            text: "good morning".to_string(),
            from: Language::English,
            to: Language::Telugu,
        });
        assert!(prompt.contains("from English to Telugu"));
        assert!(prompt.contains("good morning"));
    }
}
