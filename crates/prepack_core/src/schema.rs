//! The fixed pre-pack JSON schema and the validator that re-checks model
//! replies against it.
//!
//! The provider is asked for strict schema compliance, but nothing is taken
//! on trust: every reply is decoded and checked against the same bounds the
//! schema advertises before it can reach a response.
//!
//! `minutes` follows JSON Schema's notion of `integer`: a whole number
//! written as a float (`5.0`) is accepted, a fractional one (`2.5`) is not.

use serde_json::{json, Map, Value};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::SchemaViolation;
use crate::models::PrepackResult;

pub const SCHEMA_NAME: &str = "vox_prepack_v1";

const WORKING_TITLE_MIN: usize = 3;
const OPENING_HOOK_MIN: usize = 10;
const CLOSING_CTA_MIN: usize = 5;

const RUNDOWN_ITEMS: (usize, usize) = (3, 8);
const SEGMENT_MIN: usize = 2;
const GOAL_MIN: usize = 3;
const MINUTES_RANGE: (u32, u32) = (1, 60);

const QUESTION_ITEMS: (usize, usize) = (4, 10);
const QUESTION_MIN: usize = 5;
const FOLLOWUP_ITEMS: (usize, usize) = (1, 4);
const FOLLOWUP_MIN: usize = crate::models::FOLLOWUP_MIN_CHARS;

const MOMENT_ITEMS: (usize, usize) = (2, 6);
const LABEL_MIN: usize = 2;
const WHY_MIN: usize = 5;
const WHERE_MIN: usize = 2;

fn string_of(min_length: usize) -> Value {
    json!({ "type": "string", "minLength": min_length })
}

fn array_of(items: Value, (min, max): (usize, usize)) -> Value {
    json!({ "type": "array", "minItems": min, "maxItems": max, "items": items })
}

fn closed_object(required: &[&str], properties: Value) -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": required,
        "properties": properties,
    })
}

/// The schema sent with every structured request.
pub fn prepack_schema() -> Value {
    let segment = closed_object(
        &["segment", "minutes", "goal"],
        json!({
            "segment": string_of(SEGMENT_MIN),
            "minutes": {
                "type": "integer",
                "minimum": MINUTES_RANGE.0,
                "maximum": MINUTES_RANGE.1,
            },
            "goal": string_of(GOAL_MIN),
        }),
    );
    let question = closed_object(
        &["q", "followups"],
        json!({
            "q": string_of(QUESTION_MIN),
            "followups": array_of(string_of(FOLLOWUP_MIN), FOLLOWUP_ITEMS),
        }),
    );
    let moment = closed_object(
        &["label", "why", "where"],
        json!({
            "label": string_of(LABEL_MIN),
            "why": string_of(WHY_MIN),
            "where": string_of(WHERE_MIN),
        }),
    );

    closed_object(
        &[
            "working_title",
            "opening_hook",
            "rundown",
            "questions",
            "moment_targets",
            "closing_cta",
        ],
        json!({
            "working_title": string_of(WORKING_TITLE_MIN),
            "opening_hook": string_of(OPENING_HOOK_MIN),
            "rundown": array_of(segment, RUNDOWN_ITEMS),
            "questions": array_of(question, QUESTION_ITEMS),
            "moment_targets": array_of(moment, MOMENT_ITEMS),
            "closing_cta": string_of(CLOSING_CTA_MIN),
        }),
    )
}

/// Decode a model reply and check it against every schema bound.
pub fn decode_prepack(json: Map<String, Value>) -> Result<PrepackResult, SchemaViolation> {
    let result: PrepackResult = serde_json::from_value(Value::Object(json))
        .map_err(|e| SchemaViolation::new("$", e.to_string()))?;
    validate(&result)?;
    Ok(result)
}

/// Check a pack against the bounds `prepack_schema` advertises, reporting
/// the first violation found.
pub fn validate(pack: &PrepackResult) -> Result<(), SchemaViolation> {
    check("", pack)?;
    for (i, segment) in pack.rundown.iter().enumerate() {
        check(&format!("rundown[{i}]."), segment)?;
    }
    for (i, question) in pack.questions.iter().enumerate() {
        check(&format!("questions[{i}]."), question)?;
    }
    for (i, moment) in pack.moment_targets.iter().enumerate() {
        check(&format!("moment_targets[{i}]."), moment)?;
    }
    Ok(())
}

fn check<T: Validate>(prefix: &str, item: &T) -> Result<(), SchemaViolation> {
    item.validate().map_err(|errors| first_violation(prefix, &errors))
}

// Field errors come back in a map; sort by name so the report is stable.
fn first_violation(prefix: &str, errors: &ValidationErrors) -> SchemaViolation {
    let mut fields: Vec<(String, &Vec<ValidationError>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| (field.to_string(), errs))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let Some((field, error)) = fields
        .into_iter()
        .find_map(|(field, errs)| errs.first().map(|e| (field, e)))
    else {
        return SchemaViolation::new(prefix.trim_end_matches('.'), "invalid");
    };

    let field = if field == "placement" { "where".to_string() } else { field };
    let path = match error.params.get("index").and_then(Value::as_u64) {
        Some(index) => format!("{prefix}{field}[{index}]"),
        None => format!("{prefix}{field}"),
    };
    SchemaViolation::new(path, describe(error))
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    let param = |name: &str| error.params.get(name).map(Value::to_string);
    match (&*error.code, param("min"), param("max")) {
        ("length", Some(min), Some(max)) => format!("length must be between {min} and {max}"),
        ("length", Some(min), None) => format!("must be at least {min} characters"),
        ("range", Some(min), Some(max)) => format!("must be between {min} and {max}"),
        (code, _, _) => format!("failed {code} check"),
    }
}
