//! Responses API request and reply shapes.

use serde::Serialize;
use serde_json::Value;

use crate::config::OpenAIConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextFormat {
    JsonSchema {
        name: String,
        strict: bool,
        schema: Value,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextConfig {
    pub format: TextFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReasoningConfig {
    pub effort: String,
}

/// Body of `POST /v1/responses`.
///
/// `temperature` and `reasoning` are mutually exclusive: reasoning models
/// reject a sampling temperature at request time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub input: Vec<InputMessage>,
    pub max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningConfig>,
    pub text: TextConfig,
}

impl ResponsesRequest {
    /// Build a strict json_schema request for the configured model.
    pub fn structured(
        config: &OpenAIConfig,
        instructions: &str,
        input: &str,
        schema: &Value,
        schema_name: &str,
    ) -> Self {
        let (temperature, reasoning) = if config.is_reasoning_model() {
            (
                None,
                Some(ReasoningConfig {
                    effort: config.reasoning_effort.clone(),
                }),
            )
        } else {
            (config.temperature, None)
        };

        Self {
            model: config.model.clone(),
            input: vec![
                InputMessage {
                    role: Role::System,
                    content: instructions.to_string(),
                },
                InputMessage {
                    role: Role::User,
                    content: input.to_string(),
                },
            ],
            max_output_tokens: config.max_output_tokens,
            temperature,
            reasoning,
            text: TextConfig {
                format: TextFormat::JsonSchema {
                    name: schema_name.to_string(),
                    strict: true,
                    schema: schema.clone(),
                },
            },
        }
    }
}

/// One entry of the reply's `output` list.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputItem {
    Message { content: Vec<ContentPart> },
    Other,
}

/// One entry of a message item's `content` list.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    OutputText(String),
    Other,
}

impl OutputItem {
    /// Decode an output item. Anything unrecognised or malformed becomes `Other`
    /// or is dropped, never an error.
    pub fn from_value(value: &Value) -> Self {
        if value.get("type").and_then(Value::as_str) != Some("message") {
            return OutputItem::Other;
        }

        let content = value
            .get("content")
            .and_then(Value::as_array)
            .map(|parts| parts.iter().map(ContentPart::from_value).collect())
            .unwrap_or_default();

        OutputItem::Message { content }
    }

    fn text(&self) -> impl Iterator<Item = &str> {
        let parts: &[ContentPart] = match self {
            OutputItem::Message { content } => content,
            OutputItem::Other => &[],
        };
        parts.iter().filter_map(|part| match part {
            ContentPart::OutputText(text) => Some(text.as_str()),
            ContentPart::Other => None,
        })
    }
}

impl ContentPart {
    pub fn from_value(value: &Value) -> Self {
        if value.get("type").and_then(Value::as_str) != Some("output_text") {
            return ContentPart::Other;
        }
        match value.get("text").and_then(Value::as_str) {
            Some(text) if !text.is_empty() => ContentPart::OutputText(text.to_string()),
            _ => ContentPart::Other,
        }
    }
}

/// Pull the model's text out of a Responses API reply.
///
/// A string `output_text` at the top level wins. Otherwise the text of every
/// `output_text` part inside `message` items is concatenated in order.
pub fn extract_output_text(body: &Value) -> String {
    if let Some(text) = body.get("output_text").and_then(Value::as_str) {
        return text.to_string();
    }

    let Some(items) = body.get("output").and_then(Value::as_array) else {
        return String::new();
    };

    let items: Vec<OutputItem> = items.iter().map(OutputItem::from_value).collect();
    items.iter().flat_map(|item| item.text()).collect()
}
