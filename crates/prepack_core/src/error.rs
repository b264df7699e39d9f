use thiserror::Error;
use vox_llm::LLMError;

/// A bound of the pre-pack schema that a reply does not meet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{path}: {message}")]
pub struct SchemaViolation {
    /// JSON-pointer-like location, e.g. `questions[2].followups`.
    pub path: String,
    pub message: String,
}

impl SchemaViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum PrepackError {
    #[error(transparent)]
    Llm(#[from] LLMError),

    #[error("Model output violates the pre-pack schema: {0}")]
    Schema(#[from] SchemaViolation),

    #[error("Unexpected failure in AI generation: {0}")]
    Panicked(String),
}

pub type Result<T> = std::result::Result<T, PrepackError>;
