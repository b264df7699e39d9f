//! Request validation for `POST /api/prepack`.
//!
//! The body is checked field by field and every failing field is reported,
//! not just the first. Presence and JSON types are checked against the raw
//! object; the typed request then goes through `validator` for its bounds.
//! String values are trimmed and blank strings count as absent. Lengths are
//! counted in characters.

use std::fmt;
use std::str::FromStr;

use prepack_core::{Formality, PrepackInput, ShowFormat};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use validator::Validate;

/// Field name to messages, in the order fields were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message.into()),
            None => self.fields.push((field, vec![message.into()])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.iter().map(|(_, messages)| messages.len()).sum()
    }

    pub fn sort_by_key<K: Ord>(&mut self, mut key: impl FnMut(&str) -> K) {
        self.fields.sort_by_key(|(field, _)| key(field.as_str()));
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, messages) in &self.fields {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

/// "First message (and N more errors)".
impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.fields.first().and_then(|(_, m)| m.first()) else {
            return f.write_str("The given data was invalid.");
        };
        match self.len() - 1 {
            0 => f.write_str(first),
            1 => write!(f, "{first} (and 1 more error)"),
            more => write!(f, "{first} (and {more} more errors)"),
        }
    }
}

/// Check order; errors are reported in this order.
const FIELD_ORDER: [&str; 10] = [
    "topic",
    "purpose",
    "audience",
    "duration_minutes",
    "format",
    "guest_role_context",
    "must_points",
    "salutation",
    "formality",
    "sensitive_constraints",
];

fn label(field: &str) -> String {
    field.replace('_', " ")
}

/// `must_points.3` sorts after `must_points` and before `salutation`.
fn field_rank(field: &str) -> (usize, usize) {
    let (base, item) = match field.split_once('.') {
        Some((base, index)) => (base, index.parse::<usize>().map_or(usize::MAX, |i| i + 1)),
        None => (field, 0),
    };
    let position = FIELD_ORDER
        .iter()
        .position(|name| *name == base)
        .unwrap_or(FIELD_ORDER.len());
    (position, item)
}

/// The brief after type checks, before bound checks. Fields that failed a
/// type check hold defaults and their bound errors are ignored.
#[derive(Debug, Default, Validate)]
struct PrepackRequest {
    #[validate(length(min = 3, max = 200))]
    topic: String,
    #[validate(length(min = 3, max = 80))]
    purpose: String,
    #[validate(length(min = 2, max = 50))]
    audience: String,
    #[validate(range(min = 5, max = 180))]
    duration_minutes: i64,
    format: Option<ShowFormat>,
    #[validate(length(min = 3, max = 200))]
    guest_role_context: String,
    #[validate(length(min = 1, max = 5))]
    must_points: Vec<String>,
    #[validate(length(min = 2, max = 30))]
    salutation: String,
    formality: Option<Formality>,
    #[validate(length(max = 300))]
    sensitive_constraints: Option<String>,
}

#[derive(Debug, Validate)]
struct MustPoint {
    #[validate(length(min = 2, max = 140))]
    text: String,
}

#[derive(Clone, Copy)]
enum Measure {
    Characters,
    Items,
    Number,
}

impl PrepackRequest {
    /// The measured size of `field` and how to describe it.
    fn measure(&self, field: &str) -> Option<(i64, Measure)> {
        let chars = |s: &str| (s.chars().count() as i64, Measure::Characters);
        Some(match field {
            "topic" => chars(&self.topic),
            "purpose" => chars(&self.purpose),
            "audience" => chars(&self.audience),
            "duration_minutes" => (self.duration_minutes, Measure::Number),
            "guest_role_context" => chars(&self.guest_role_context),
            "must_points" => (self.must_points.len() as i64, Measure::Items),
            "salutation" => chars(&self.salutation),
            "sensitive_constraints" => chars(self.sensitive_constraints.as_deref()?),
            _ => return None,
        })
    }
}

fn bound_message(
    name: &str,
    error: &validator::ValidationError,
    (actual, measure): (i64, Measure),
) -> String {
    let param = |key: &str| error.params.get(key).and_then(Value::as_i64);
    match (param("min"), param("max"), measure) {
        (Some(min), _, Measure::Characters) if actual < min => {
            format!("The {name} field must be at least {min} characters.")
        }
        (Some(min), _, Measure::Items) if actual < min => {
            format!("The {name} field must have at least {min} items.")
        }
        (Some(min), _, Measure::Number) if actual < min => {
            format!("The {name} field must be at least {min}.")
        }
        (_, Some(max), Measure::Characters) if actual > max => {
            format!("The {name} field must not be greater than {max} characters.")
        }
        (_, Some(max), Measure::Items) if actual > max => {
            format!("The {name} field must not have more than {max} items.")
        }
        (_, Some(max), Measure::Number) if actual > max => {
            format!("The {name} field must not be greater than {max}.")
        }
        _ => format!("The {name} field is invalid."),
    }
}

/// Presence and type checks over the raw JSON object.
struct TypeChecks<'a> {
    body: &'a Map<String, Value>,
    errors: ValidationErrors,
}

impl<'a> TypeChecks<'a> {
    /// The field's value, with null and blank strings treated as absent.
    fn present(&self, field: &str) -> Option<&'a Value> {
        match self.body.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(value) => Some(value),
        }
    }

    fn required(&mut self, field: &str) -> Option<&'a Value> {
        let value = self.present(field);
        if value.is_none() {
            self.errors
                .add(field, format!("The {} field is required.", label(field)));
        }
        value
    }

    fn string(&mut self, field: &str, name: &str, value: &Value) -> Option<String> {
        match value.as_str() {
            Some(text) => Some(text.trim().to_string()),
            None => {
                self.errors
                    .add(field, format!("The {name} field must be a string."));
                None
            }
        }
    }

    fn required_text(&mut self, field: &str) -> String {
        self.required(field)
            .and_then(|value| self.string(field, &label(field), value))
            .unwrap_or_default()
    }

    fn optional_text(&mut self, field: &str) -> Option<String> {
        let value = self.present(field)?;
        self.string(field, &label(field), value)
    }

    /// Integers, numeric strings, and whole-number floats like `30.0`.
    fn required_integer(&mut self, field: &str) -> i64 {
        let Some(value) = self.required(field) else {
            return 0;
        };
        let number = match value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        number.unwrap_or_else(|| {
            self.errors
                .add(field, format!("The {} field must be an integer.", label(field)));
            0
        })
    }

    fn required_choice<T: FromStr>(&mut self, field: &str) -> Option<T> {
        let value = self.required(field)?;
        match value.as_str().map(str::trim).map(str::parse::<T>) {
            Some(Ok(choice)) => Some(choice),
            _ => {
                self.errors
                    .add(field, format!("The selected {} is invalid.", label(field)));
                None
            }
        }
    }

    /// Items that fail a type check are kept as empty strings so positions
    /// line up with the request.
    fn required_text_list(&mut self, field: &str) -> Vec<String> {
        let Some(value) = self.required(field) else {
            return Vec::new();
        };
        let Some(items) = value.as_array() else {
            self.errors
                .add(field, format!("The {} field must be an array.", label(field)));
            return Vec::new();
        };
        if items.is_empty() {
            self.errors
                .add(field, format!("The {} field is required.", label(field)));
            return Vec::new();
        }

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let item_field = format!("{field}.{i}");
                let blank = match item {
                    Value::Null => true,
                    Value::String(s) => s.trim().is_empty(),
                    _ => false,
                };
                if blank {
                    self.errors
                        .add(&item_field, format!("The {item_field} field is required."));
                    return String::new();
                }
                // Items are named by their dotted path.
                self.string(&item_field, &item_field, item)
                    .unwrap_or_default()
            })
            .collect()
    }
}

/// Validate a raw request body into a brief. Anything that is not a JSON
/// object is treated as an empty body.
pub fn validate_prepack_request(body: &Value) -> Result<PrepackInput, ValidationErrors> {
    let empty = Map::new();
    let mut checks = TypeChecks {
        body: body.as_object().unwrap_or(&empty),
        errors: ValidationErrors::default(),
    };

    let request = PrepackRequest {
        topic: checks.required_text("topic"),
        purpose: checks.required_text("purpose"),
        audience: checks.required_text("audience"),
        duration_minutes: checks.required_integer("duration_minutes"),
        format: checks.required_choice("format"),
        guest_role_context: checks.required_text("guest_role_context"),
        must_points: checks.required_text_list("must_points"),
        salutation: checks.required_text("salutation"),
        formality: checks.required_choice("formality"),
        sensitive_constraints: checks.optional_text("sensitive_constraints"),
    };
    let mut errors = checks.errors;

    if let Err(bounds) = request.validate() {
        for (field, field_errors) in bounds.field_errors() {
            let field: &str = field.as_ref();
            if errors.get(field).is_some() {
                continue;
            }
            let Some(measured) = request.measure(field) else {
                continue;
            };
            for error in field_errors.iter() {
                errors.add(field, bound_message(&label(field), error, measured));
            }
        }
    }

    for (i, text) in request.must_points.iter().enumerate() {
        let item_field = format!("must_points.{i}");
        if errors.get(&item_field).is_some() {
            continue;
        }
        if let Err(bounds) = (MustPoint { text: text.clone() }).validate() {
            let measured = (text.chars().count() as i64, Measure::Characters);
            for error in bounds.field_errors().into_values().flatten() {
                errors.add(&item_field, bound_message(&item_field, error, measured));
            }
        }
    }

    if !errors.is_empty() {
        errors.sort_by_key(field_rank);
        return Err(errors);
    }

    match request {
        PrepackRequest {
            topic,
            purpose,
            audience,
            duration_minutes,
            format: Some(format),
            guest_role_context,
            must_points,
            salutation,
            formality: Some(formality),
            sensitive_constraints,
        } => Ok(PrepackInput {
            topic,
            purpose,
            audience,
            // Bounded to 5..=180 above.
            duration_minutes: duration_minutes as u32,
            format,
            guest_role_context,
            must_points,
            salutation,
            formality,
            sensitive_constraints,
        }),
        // A missing choice always records an error above.
        _ => Err(errors),
    }
}
