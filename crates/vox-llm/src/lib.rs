pub mod config;
pub mod protocol;
pub mod provider;
pub mod providers;

pub use config::OpenAIConfig;
pub use protocol::responses::{extract_output_text, ResponsesRequest};
pub use provider::{LLMError, Result, StructuredGenerator, StructuredOutput};
pub use providers::ResponsesClient;
