use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("OpenAI request failed: HTTP {status} — {body}")]
    UpstreamHttp { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, LLMError>;

/// A schema-constrained model reply.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredOutput {
    /// The reply parsed as a JSON object.
    pub json: Map<String, Value>,
    /// The concatenated text the object was parsed from.
    pub raw: String,
    /// The model identifier the request was sent to.
    pub model: String,
}

#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    /// Ask the model for a JSON object conforming to `schema`.
    ///
    /// # Arguments
    /// * `instructions` - System message
    /// * `input` - User message
    /// * `schema` - JSON schema the reply must satisfy
    /// * `schema_name` - Name the schema is registered under in the request
    async fn generate_structured(
        &self,
        instructions: &str,
        input: &str,
        schema: &Value,
        schema_name: &str,
    ) -> Result<StructuredOutput>;
}
