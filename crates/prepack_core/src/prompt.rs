//! Instruction and user-message text for the structured request.

use crate::models::{Formality, PrepackInput};

pub const TONE_VERY_FORMAL: &str = "sangat sopan, formal, tenang";
pub const TONE_WARM: &str = "hangat, ramah, membumi";
pub const TONE_LIGHTLY_FORMAL: &str = "formal ringan, hangat, sopan";

const NO_CONSTRAINTS: &str = "(tidak ada)";

pub fn tone_for(formality: Formality) -> &'static str {
    match formality {
        Formality::SangatFormal => TONE_VERY_FORMAL,
        Formality::HangatRamah => TONE_WARM,
        _ => TONE_LIGHTLY_FORMAL,
    }
}

/// System message: persona, tone, safety rules, schema compliance.
pub fn build_instructions(input: &PrepackInput) -> String {
    [
        "Kamu adalah asisten Komsos Gereja bernama Vox Ecclesiae.".to_string(),
        "Tugas: buat PRE Pack untuk produksi video/podcast rohani.".to_string(),
        "Bahasa: Indonesia.".to_string(),
        format!("Tone: {}.", tone_for(input.formality)),
        "Aturan: jangan bahas politik praktis; jangan sebut nama orang nyata; jaga sensitivitas; fokus membangun iman dan aplikasi praktis.".to_string(),
        "Wajib patuh schema JSON yang diberikan (strict).".to_string(),
    ]
    .join("\n")
}

/// User message: every brief field as a labeled line, then the request.
pub fn build_user_message(input: &PrepackInput) -> String {
    let constraints = input
        .sensitive_constraints
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(NO_CONSTRAINTS);

    [
        format!("Topik: {}", input.topic),
        format!("Tujuan: {}", input.purpose),
        format!("Audiens: {}", input.audience),
        format!("Durasi: {} menit", input.duration_minutes),
        format!("Format: {}", input.format),
        format!("Konteks narasumber: {}", input.guest_role_context),
        format!("Sapaan: {}", input.salutation),
        format!("Poin wajib: {}", input.must_points.join("; ")),
        format!("Batasan sensitif: {}", constraints),
        String::new(),
        "Outputkan PRE Pack yang praktis dan siap dipakai host untuk wawancara.".to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShowFormat;

    fn input(formality: Formality) -> PrepackInput {
        PrepackInput {
            topic: "Kesetiaan".to_string(),
            purpose: "Edukasi".to_string(),
            audience: "Remaja".to_string(),
            duration_minutes: 30,
            format: ShowFormat::Interview,
            guest_role_context: "Pendeta muda".to_string(),
            must_points: vec!["Kesetiaan itu pilihan".to_string(), "Doa harian".to_string()],
            salutation: "Pak Budi".to_string(),
            formality,
            sensitive_constraints: None,
        }
    }

    #[test]
    fn very_formal_tone() {
        let text = build_instructions(&input(Formality::SangatFormal));
        assert!(text.contains("Tone: sangat sopan, formal, tenang."));
    }

    #[test]
    fn warm_tone() {
        let text = build_instructions(&input(Formality::HangatRamah));
        assert!(text.contains("Tone: hangat, ramah, membumi."));
    }

    #[test]
    fn lightly_formal_tone() {
        let text = build_instructions(&input(Formality::FormalRingan));
        assert!(text.contains("Tone: formal ringan, hangat, sopan."));
        assert!(!text.contains(TONE_VERY_FORMAL));
    }

    #[test]
    fn instructions_carry_rules_and_schema_line() {
        let text = build_instructions(&input(Formality::FormalRingan));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("Vox Ecclesiae"));
        assert!(lines[4].contains("jangan bahas politik praktis"));
        assert!(lines[4].contains("jangan sebut nama orang nyata"));
        assert!(lines[5].contains("schema JSON"));
    }

    #[test]
    fn user_message_lists_fields_in_order() {
        let text = build_user_message(&input(Formality::FormalRingan));
        let expected = "Topik: Kesetiaan\n\
            Tujuan: Edukasi\n\
            Audiens: Remaja\n\
            Durasi: 30 menit\n\
            Format: interview\n\
            Konteks narasumber: Pendeta muda\n\
            Sapaan: Pak Budi\n\
            Poin wajib: Kesetiaan itu pilihan; Doa harian\n\
            Batasan sensitif: (tidak ada)\n\
            \n\
            Outputkan PRE Pack yang praktis dan siap dipakai host untuk wawancara.";
        assert_eq!(text, expected);
    }

    #[test]
    fn user_message_includes_constraints_when_present() {
        let mut brief = input(Formality::FormalRingan);
        brief.sensitive_constraints = Some("Hindari isu perceraian".to_string());
        let text = build_user_message(&brief);
        assert!(text.contains("Batasan sensitif: Hindari isu perceraian"));

        brief.sensitive_constraints = Some(String::new());
        let text = build_user_message(&brief);
        assert!(text.contains("Batasan sensitif: (tidak ada)"));
    }
}
