use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

pub const PACK_TYPE: &str = "pre";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowFormat {
    Interview,
    Panel,
}

impl ShowFormat {
    pub const ALL: [ShowFormat; 2] = [ShowFormat::Interview, ShowFormat::Panel];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShowFormat::Interview => "interview",
            ShowFormat::Panel => "panel",
        }
    }
}

impl fmt::Display for ShowFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShowFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShowFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| format!("unknown format '{}'", s))
    }
}

/// Register the host should speak in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formality {
    FormalRingan,
    SangatFormal,
    HangatRamah,
}

impl Formality {
    pub const ALL: [Formality; 3] = [
        Formality::FormalRingan,
        Formality::SangatFormal,
        Formality::HangatRamah,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Formality::FormalRingan => "formal_ringan",
            Formality::SangatFormal => "sangat_formal",
            Formality::HangatRamah => "hangat_ramah",
        }
    }
}

impl fmt::Display for Formality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Formality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formality::ALL
            .into_iter()
            .find(|formality| formality.as_str() == s)
            .ok_or_else(|| format!("unknown formality '{}'", s))
    }
}

/// Episode brief as accepted by the HTTP layer. `must_points` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepackInput {
    pub topic: String,
    pub purpose: String,
    pub audience: String,
    pub duration_minutes: u32,
    pub format: ShowFormat,
    pub guest_role_context: String,
    pub must_points: Vec<String>,
    pub salutation: String,
    pub formality: Formality,
    #[serde(default)]
    pub sensitive_constraints: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RundownSegment {
    #[validate(length(min = 2))]
    pub segment: String,
    #[serde(deserialize_with = "integral_u32")]
    #[validate(range(min = 1, max = 60))]
    pub minutes: u32,
    #[validate(length(min = 3))]
    pub goal: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Question {
    #[validate(length(min = 5))]
    pub q: String,
    #[validate(length(min = 1, max = 4), custom(function = "validate_followups"))]
    pub followups: Vec<String>,
}

/// A passage worth cutting into a short.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct MomentTarget {
    #[validate(length(min = 2))]
    pub label: String,
    #[validate(length(min = 5))]
    pub why: String,
    #[serde(rename = "where")]
    #[validate(length(min = 2))]
    pub placement: String,
}

/// List items are checked one by one by `schema::validate` so their
/// positions can be reported; only the list sizes are declared here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PrepackResult {
    #[validate(length(min = 3))]
    pub working_title: String,
    #[validate(length(min = 10))]
    pub opening_hook: String,
    #[validate(length(min = 3, max = 8))]
    pub rundown: Vec<RundownSegment>,
    #[validate(length(min = 4, max = 10))]
    pub questions: Vec<Question>,
    #[validate(length(min = 2, max = 6))]
    pub moment_targets: Vec<MomentTarget>,
    #[validate(length(min = 5))]
    pub closing_cta: String,
}

pub const FOLLOWUP_MIN_CHARS: usize = 3;

/// Fails on the first follow-up shorter than [`FOLLOWUP_MIN_CHARS`]; the
/// error carries its position in the `index` param.
fn validate_followups(followups: &[String]) -> Result<(), ValidationError> {
    let Some(index) = followups
        .iter()
        .position(|f| f.chars().count() < FOLLOWUP_MIN_CHARS)
    else {
        return Ok(());
    };
    let mut error = ValidationError::new("length").with_message(
        format!("must be at least {FOLLOWUP_MIN_CHARS} characters").into(),
    );
    error.add_param("index".into(), &index);
    error.add_param("min".into(), &FOLLOWUP_MIN_CHARS);
    Err(error)
}

/// Whole numbers, including JSON spellings like `5.0`.
fn integral_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    number
        .as_u64()
        .or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX))
                .map(|f| f as u64)
        })
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| de::Error::custom(format!("expected a whole number, got {number}")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackVersion {
    #[serde(rename = "v1_ai")]
    Ai,
    #[serde(rename = "v1_dummy")]
    Dummy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiStatus {
    pub used: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl AiStatus {
    pub fn used(model: impl Into<String>) -> Self {
        Self {
            used: true,
            model: Some(model.into()),
            ..Self::default()
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Response body of one generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationEnvelope {
    pub ok: bool,
    pub pack_type: String,
    pub version: PackVersion,
    pub ai: AiStatus,
    pub input: PrepackInput,
    pub prepack: PrepackResult,
    pub markdown: String,
}

impl GenerationEnvelope {
    pub fn new(
        version: PackVersion,
        ai: AiStatus,
        input: PrepackInput,
        prepack: PrepackResult,
        markdown: String,
    ) -> Self {
        Self {
            ok: true,
            pack_type: PACK_TYPE.to_string(),
            version,
            ai,
            input,
            prepack,
            markdown,
        }
    }
}
