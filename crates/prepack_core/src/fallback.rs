//! Template pack built from the brief alone, used whenever the AI path is
//! off or fails.
//!
//! Segment durations are fixed and do not follow `duration_minutes`.

use crate::models::{MomentTarget, PrepackInput, PrepackResult, Question, RundownSegment};

const RUNDOWN: [(&str, u32, &str); 5] = [
    ("Intro & konteks", 2, "Set tone, kenalin topik dan narasumber."),
    ("Cerita nyata / pemantik", 6, "Masuk realita, problem yang sering kejadian."),
    ("Insight inti Gereja / iman", 10, "Benang merah: apa yang Tuhan mau kita pahami."),
    ("Aplikasi praktis", 8, "Langkah kecil yang bisa dilakukan minggu ini."),
    ("Closing & ajakan refleksi", 2, "Ringkas, doa singkat/CTA elegan."),
];

const MOMENT_TARGETS: [(&str, &str, &str); 3] = [
    (
        "One-liner benang merah",
        "Bahan paling gampang jadi Shorts/teks overlay.",
        "Segmen Insight inti",
    ),
    (
        "Step praktis 3 langkah",
        "Audiens suka yang bisa langsung dipraktikkan.",
        "Segmen Aplikasi praktis",
    ),
    (
        "Cerita nyata singkat",
        "Story = emosi kebuka, retention naik.",
        "Segmen Cerita/pemantik",
    ),
];

const CLOSING_CTA: &str = "Terima kasih sudah menemani. Kalau episode ini menguatkan, \
    boleh share ke 1 orang yang kamu sayangi. Tuhan memberkati.";

fn question(q: String, followups: &[&str]) -> Question {
    Question {
        q,
        followups: followups.iter().map(|f| f.to_string()).collect(),
    }
}

/// Build a complete pack without any external call.
pub fn generate_deterministic(input: &PrepackInput) -> PrepackResult {
    let first_point = input.must_points.first().map(String::as_str).unwrap_or_default();

    let working_title = format!(
        "({}) {} — Obrolan {}",
        input.audience, input.topic, input.purpose
    );
    let opening_hook = format!(
        "Bayangin kalau kita sudah sibuk ke mana-mana, tapi hati tetap kosong. \
         Di episode ini, kita ngobrol soal “{}” bareng {} ({}) — supaya iman nyambung lagi ke hidup harian.",
        input.topic, input.salutation, input.guest_role_context
    );

    let rundown = RUNDOWN
        .iter()
        .map(|(segment, minutes, goal)| RundownSegment {
            segment: segment.to_string(),
            minutes: *minutes,
            goal: goal.to_string(),
        })
        .collect();

    let questions = vec![
        question(
            format!("Kalau {} itu dirangkum 1 kalimat, apa intinya?", input.topic),
            &[
                "Boleh kasih contoh paling dekat di hidup sehari-hari?",
                "Apa kesalahan paling umum yang sering orang lakukan di sini?",
            ],
        ),
        question(
            format!(
                "Menurut {}, kenapa topik ini penting buat {}?",
                input.salutation, input.audience
            ),
            &[
                "Kalau orang menganggap ini sepele, biasanya dampaknya apa?",
                "Apa tanda-tanda kita mulai melenceng tanpa sadar?",
            ],
        ),
        question(
            format!(
                "Dari poin wajib pertama: {} — ini mau dibawa ke arah apa?",
                first_point
            ),
            &[
                "Kalau dijelasin ke orang awam, analoginya apa?",
                "Apa 1 latihan kecil yang bisa dicoba minggu ini?",
            ],
        ),
        question(
            "Apa momen yang biasanya jadi turning point dalam proses rohani terkait topik ini?"
                .to_string(),
            &[
                "Ada contoh pengalaman nyata (tanpa sebut nama) yang bisa jadi pelajaran?",
                "Kalau lagi jatuh/mandek, mulai lagi dari mana?",
            ],
        ),
        question(
            "Kalau kita mau tutup episode ini dengan 1 kalimat benang merah, kalimatnya apa?"
                .to_string(),
            &["Bikin versi singkatnya yang enak jadi pinned comment dong."],
        ),
    ];

    let moment_targets = MOMENT_TARGETS
        .iter()
        .map(|(label, why, placement)| MomentTarget {
            label: label.to_string(),
            why: why.to_string(),
            placement: placement.to_string(),
        })
        .collect();

    PrepackResult {
        working_title,
        opening_hook,
        rundown,
        questions,
        moment_targets,
        closing_cta: CLOSING_CTA.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Formality, ShowFormat};
    use crate::schema;

    fn brief() -> PrepackInput {
        PrepackInput {
            topic: "Kesetiaan".to_string(),
            purpose: "Edukasi".to_string(),
            audience: "Remaja".to_string(),
            duration_minutes: 30,
            format: ShowFormat::Interview,
            guest_role_context: "Pendeta muda".to_string(),
            must_points: vec!["Kesetiaan itu pilihan".to_string()],
            salutation: "Pak Budi".to_string(),
            formality: Formality::HangatRamah,
            sensitive_constraints: None,
        }
    }

    #[test]
    fn output_satisfies_schema_bounds() {
        assert_eq!(schema::validate(&generate_deterministic(&brief())), Ok(()));
    }

    #[test]
    fn output_satisfies_schema_for_minimal_briefs() {
        let minimal = PrepackInput {
            topic: "Doa".to_string(),
            purpose: "Ajak".to_string(),
            audience: "OMK".to_string(),
            duration_minutes: 5,
            format: ShowFormat::Panel,
            guest_role_context: "Suster".to_string(),
            must_points: vec!["Ok".to_string()],
            salutation: "Sr".to_string(),
            formality: Formality::SangatFormal,
            sensitive_constraints: Some("Tidak ada".to_string()),
        };
        assert_eq!(schema::validate(&generate_deterministic(&minimal)), Ok(()));
    }

    #[test]
    fn rundown_is_fixed_regardless_of_duration() {
        let mut long = brief();
        long.duration_minutes = 180;
        let pack = generate_deterministic(&long);
        let minutes: Vec<u32> = pack.rundown.iter().map(|s| s.minutes).collect();
        assert_eq!(minutes, vec![2, 6, 10, 8, 2]);
        assert_eq!(pack.rundown[0].segment, "Intro & konteks");
    }

    #[test]
    fn questions_interpolate_brief() {
        let pack = generate_deterministic(&brief());
        assert_eq!(pack.questions.len(), 5);
        assert_eq!(
            pack.questions[0].q,
            "Kalau Kesetiaan itu dirangkum 1 kalimat, apa intinya?"
        );
        assert_eq!(
            pack.questions[1].q,
            "Menurut Pak Budi, kenapa topik ini penting buat Remaja?"
        );
        assert!(pack.questions[2].q.contains("Kesetiaan itu pilihan"));
        let followups: Vec<usize> = pack.questions.iter().map(|q| q.followups.len()).collect();
        assert_eq!(followups, vec![2, 2, 2, 2, 1]);
    }

    #[test]
    fn title_hook_and_cta() {
        let pack = generate_deterministic(&brief());
        assert_eq!(pack.working_title, "(Remaja) Kesetiaan — Obrolan Edukasi");
        assert!(pack
            .opening_hook
            .contains("ngobrol soal “Kesetiaan” bareng Pak Budi (Pendeta muda)"));
        assert!(pack.closing_cta.ends_with("Tuhan memberkati."));
        assert_eq!(pack.moment_targets.len(), 3);
    }

    #[test]
    fn same_brief_same_pack() {
        assert_eq!(generate_deterministic(&brief()), generate_deterministic(&brief()));
    }
}
