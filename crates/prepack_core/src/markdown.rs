//! Fixed-section Markdown view of a pack.
//!
//! Rendering works on raw JSON and never fails: absent or wrong-typed fields
//! render as empty text, and list entries that are not objects are skipped.

use serde_json::Value;

use crate::models::PrepackResult;

pub const TITLE: &str = "## PRE-PRODUCTION PACK — Vox Ecclesiae";
pub const HEADING_TITLE: &str = "### 1) Judul kerja episode";
pub const HEADING_HOOK: &str = "### 2) Opening Hook (30–60 detik)";
pub const HEADING_RUNDOWN: &str = "### 3) Rundown segmen";
pub const HEADING_QUESTIONS: &str = "### 4) Pertanyaan inti + follow-up";
pub const HEADING_MOMENTS: &str = "### 5) Moment Target";
pub const HEADING_CLOSING: &str = "### 6) Closing + CTA elegan";

/// Scalars as text; anything else as empty.
fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "1".to_string(),
        _ => String::new(),
    }
}

/// Object entries of a list field; anything else as empty.
fn entries<'a>(pack: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    pack.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|entry| entry.is_object())
}

pub fn render(pack: &Value) -> String {
    let mut lines = vec![
        TITLE.to_string(),
        String::new(),
        HEADING_TITLE.to_string(),
        format!("- {}", text(pack.get("working_title"))),
        String::new(),
        HEADING_HOOK.to_string(),
        text(pack.get("opening_hook")),
        String::new(),
        HEADING_RUNDOWN.to_string(),
    ];

    lines.extend(entries(pack, "rundown").map(|segment| {
        format!(
            "- **{}** ({}m): {}",
            text(segment.get("segment")),
            text(segment.get("minutes")),
            text(segment.get("goal"))
        )
    }));

    lines.push(String::new());
    lines.push(HEADING_QUESTIONS.to_string());
    for (i, question) in entries(pack, "questions").enumerate() {
        lines.push(format!("{}. {}", i + 1, text(question.get("q"))));
        let followups = question
            .get("followups")
            .and_then(Value::as_array)
            .into_iter()
            .flatten();
        lines.extend(followups.map(|f| format!("   - follow-up: {}", text(Some(f)))));
    }

    lines.push(String::new());
    lines.push(HEADING_MOMENTS.to_string());
    lines.extend(entries(pack, "moment_targets").map(|moment| {
        format!(
            "- **{}** ({}): {}",
            text(moment.get("label")),
            text(moment.get("where")),
            text(moment.get("why"))
        )
    }));

    lines.push(String::new());
    lines.push(HEADING_CLOSING.to_string());
    lines.push(text(pack.get("closing_cta")));

    lines.join("\n")
}

pub fn render_result(pack: &PrepackResult) -> String {
    render(&serde_json::to_value(pack).unwrap_or_default())
}
