//! Context Assembly
//!
//! Deterministic construction of the text prompt sent to the language
//! backend. Pure functions over well-typed inputs: identical arguments
//! produce byte-identical output, and no timestamp or random content ever
//! enters the assembled text.

use super::types::{ConversationTurn, UserContext};

/// Character cap for assistant replies rendered in the history section.
/// A display-size cap only; stored turns keep the full text.
pub const REPLY_PREVIEW_CHARS: usize = 200;

/// Name the backend continues from, also used as the assistant line prefix.
pub const ASSISTANT_MARKER: &str = "CareerMentorAI:";

/// Builds the full prompt: instruction block, optional user-context section,
/// bounded history (oldest first), then the new message and the marker the
/// backend should continue after.
pub fn assemble(
    instruction: &str,
    user_context: Option<&UserContext>,
    recent: &[ConversationTurn],
    message: &str,
) -> String {
    let mut parts: Vec<String> = vec![instruction.to_string()];

    if let Some(context) = user_context {
        let lines = context_lines(context);
        if !lines.is_empty() {
            parts.push("\nKONTEKS USER:".to_string());
            parts.extend(lines);
        }
    }

    if !recent.is_empty() {
        parts.push("\nRIWAYAT PERCAKAPAN TERBARU:".to_string());
        for turn in recent {
            parts.push(format!("User: {}", turn.user_text));
            parts.push(format!(
                "{} {}",
                ASSISTANT_MARKER,
                preview_reply(&turn.assistant_text)
            ));
        }
    }

    parts.push(format!("\nUser: {}", message));
    parts.push(ASSISTANT_MARKER.to_string());

    parts.join("\n")
}

/// Renders only populated fields; an absent optional is simply omitted.
fn context_lines(context: &UserContext) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(profile) = &context.assessment {
        if !profile.interests.is_empty() {
            lines.push(format!("- Minat: {}", profile.interests.join(", ")));
        }
        if !profile.skills.is_empty() {
            lines.push(format!("- Skills: {}", profile.skills.join(", ")));
        }
        if !profile.experience_level.is_empty() {
            lines.push(format!("- Pengalaman: {}", profile.experience_level));
        }
        if !profile.education.is_empty() {
            lines.push(format!("- Pendidikan: {}", profile.education));
        }
        if !profile.work_values.is_empty() {
            lines.push(format!("- Work Values: {}", profile.work_values.join(", ")));
        }
    }

    if let Some(stage) = &context.career_stage {
        lines.push(format!("- Career Stage: {}", stage));
    }
    if let Some(goals) = &context.goals {
        lines.push(format!("- Goals: {}", goals));
    }

    lines
}

/// Caps a reply at [`REPLY_PREVIEW_CHARS`] characters. Replies at or under
/// the cap pass through untouched; longer ones are cut at the cap and marked
/// with an ellipsis.
fn preview_reply(text: &str) -> String {
    match text.char_indices().nth(REPLY_PREVIEW_CHARS) {
        None => text.to_string(),
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::UserProfile;
    use chrono::Utc;

    fn turn(user: &str, assistant: &str) -> ConversationTurn {
        ConversationTurn {
            user_text: user.to_string(),
            assistant_text: assistant.to_string(),
            timestamp: Utc::now(),
            context: None,
        }
    }

    #[test]
    fn assembly_is_deterministic() {
        let turns = vec![turn("Halo", "Halo! Ada yang bisa saya bantu?")];
        let context = UserContext {
            assessment: Some(UserProfile {
                interests: vec!["teknologi".into()],
                skills: vec!["Python".into()],
                experience_level: "Entry level".into(),
                education: "S1".into(),
                work_values: vec![],
            }),
            career_stage: Some("Fresh graduate".into()),
            goals: None,
        };

        let first = assemble("INSTRUKSI", Some(&context), &turns, "Karir apa yang cocok?");
        let second = assemble("INSTRUKSI", Some(&context), &turns, "Karir apa yang cocok?");
        assert_eq!(first, second);
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let turns = vec![turn("pertanyaan", "jawaban")];
        let context = UserContext {
            goals: Some("Menjadi data scientist".into()),
            ..Default::default()
        };

        let prompt = assemble("INSTRUKSI", Some(&context), &turns, "lanjut");
        let instruction_at = prompt.find("INSTRUKSI").unwrap();
        let context_at = prompt.find("KONTEKS USER:").unwrap();
        let history_at = prompt.find("RIWAYAT PERCAKAPAN TERBARU:").unwrap();
        let message_at = prompt.find("\nUser: lanjut").unwrap();
        assert!(instruction_at < context_at);
        assert!(context_at < history_at);
        assert!(history_at < message_at);
        assert!(prompt.ends_with(ASSISTANT_MARKER));
    }

    #[test]
    fn empty_optional_sections_are_omitted() {
        let prompt = assemble("INSTRUKSI", None, &[], "Halo");
        assert!(!prompt.contains("KONTEKS USER:"));
        assert!(!prompt.contains("RIWAYAT"));

        // Context present but entirely blank renders no section either.
        let blank = UserContext::default();
        let prompt = assemble("INSTRUKSI", Some(&blank), &[], "Halo");
        assert!(!prompt.contains("KONTEKS USER:"));
    }

    #[test]
    fn only_populated_profile_fields_render() {
        let context = UserContext {
            assessment: Some(UserProfile {
                interests: vec![],
                skills: vec!["Desain".into()],
                experience_level: String::new(),
                education: "SMA".into(),
                work_values: vec![],
            }),
            ..Default::default()
        };

        let prompt = assemble("INSTRUKSI", Some(&context), &[], "Halo");
        assert!(prompt.contains("- Skills: Desain"));
        assert!(prompt.contains("- Pendidikan: SMA"));
        assert!(!prompt.contains("- Minat:"));
        assert!(!prompt.contains("- Pengalaman:"));
    }

    #[test]
    fn history_renders_oldest_first() {
        let turns = vec![turn("pertama", "satu"), turn("kedua", "dua")];
        let prompt = assemble("INSTRUKSI", None, &turns, "ketiga");
        let first_at = prompt.find("User: pertama").unwrap();
        let second_at = prompt.find("User: kedua").unwrap();
        assert!(first_at < second_at);
    }

    #[test]
    fn reply_at_cap_is_not_truncated() {
        let exact = "a".repeat(REPLY_PREVIEW_CHARS);
        let turns = vec![turn("q", &exact)];
        let prompt = assemble("I", None, &turns, "m");
        assert!(prompt.contains(&exact));
        assert!(!prompt.contains(&format!("{}...", exact)));
    }

    #[test]
    fn reply_over_cap_is_cut_to_cap_plus_marker() {
        let long = "b".repeat(REPLY_PREVIEW_CHARS + 1);
        let turns = vec![turn("q", &long)];
        let prompt = assemble("I", None, &turns, "m");

        let expected = format!("{}...", "b".repeat(REPLY_PREVIEW_CHARS));
        assert!(prompt.contains(&expected));
        assert!(!prompt.contains(&long));
    }

    #[test]
    fn truncation_respects_multibyte_characters() {
        let long: String = "é".repeat(REPLY_PREVIEW_CHARS + 50);
        let turns = vec![turn("q", &long)];
        let prompt = assemble("I", None, &turns, "m");
        let expected = format!("{}...", "é".repeat(REPLY_PREVIEW_CHARS));
        assert!(prompt.contains(&expected));
    }
}
