//! Pack orchestration: AI when available, template pack otherwise.
//!
//! `generate` is infallible. Every failure on the AI path, including a panic,
//! is folded into the template envelope with the error message attached.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use vox_llm::{LLMError, OpenAIConfig, ResponsesClient, StructuredGenerator};

use crate::error::PrepackError;
use crate::fallback;
use crate::markdown;
use crate::models::{AiStatus, GenerationEnvelope, PackVersion, PrepackInput, PrepackResult};
use crate::prompt;
use crate::schema::{self, SCHEMA_NAME};

pub const AI_SKIPPED_REASON: &str = "OPENAI disabled or key missing";

/// A validated, rendered pack produced by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct AiSuccess {
    pub prepack: PrepackResult,
    pub markdown: String,
    pub model: String,
}

pub type AiFailure = PrepackError;

pub struct PrepackGenerator {
    config: OpenAIConfig,
    client: Arc<dyn StructuredGenerator>,
}

impl PrepackGenerator {
    /// Generator backed by the Responses API client for `config`.
    pub fn new(config: OpenAIConfig) -> Result<Self, LLMError> {
        let client = ResponsesClient::new(config.clone())?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    pub fn with_client(config: OpenAIConfig, client: Arc<dyn StructuredGenerator>) -> Self {
        Self { config, client }
    }

    pub async fn generate(&self, input: PrepackInput) -> GenerationEnvelope {
        let fallback = fallback::generate_deterministic(&input);

        if !self.config.ai_available() {
            log::info!("AI generation skipped: {}", AI_SKIPPED_REASON);
            return fallback_envelope(input, fallback, AiStatus::skipped(AI_SKIPPED_REASON));
        }

        match self.attempt_ai(&input).await {
            Ok(success) => {
                log::info!("Pre-pack generated by model {}", success.model);
                GenerationEnvelope::new(
                    PackVersion::Ai,
                    AiStatus::used(success.model),
                    input,
                    success.prepack,
                    success.markdown,
                )
            }
            Err(e) => {
                log::warn!("AI generation failed, serving template pack: {}", e);
                fallback_envelope(input, fallback, AiStatus::failed(e.to_string()))
            }
        }
    }

    async fn attempt_ai(&self, input: &PrepackInput) -> Result<AiSuccess, AiFailure> {
        AssertUnwindSafe(self.try_generate_ai(input))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(PrepackError::Panicked(panic_message(payload.as_ref()))))
    }

    /// The AI path on its own: prompt, call, decode, validate, render.
    pub async fn try_generate_ai(&self, input: &PrepackInput) -> Result<AiSuccess, AiFailure> {
        let schema = schema::prepack_schema();
        let instructions = prompt::build_instructions(input);
        let user_message = prompt::build_user_message(input);

        let output = self
            .client
            .generate_structured(&instructions, &user_message, &schema, SCHEMA_NAME)
            .await?;

        let prepack = schema::decode_prepack(output.json)?;
        let markdown = markdown::render_result(&prepack);

        Ok(AiSuccess {
            prepack,
            markdown,
            model: output.model,
        })
    }
}

fn fallback_envelope(
    input: PrepackInput,
    prepack: PrepackResult,
    ai: AiStatus,
) -> GenerationEnvelope {
    let markdown = markdown::render_result(&prepack);
    GenerationEnvelope::new(PackVersion::Dummy, ai, input, prepack, markdown)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Formality, ShowFormat};
    use async_trait::async_trait;
    use serde_json::{json, Map, Value};
    use std::sync::Mutex;
    use vox_llm::StructuredOutput;

    enum Reply {
        Json(Value),
        Fail(fn() -> LLMError),
        Panic,
    }

    struct FakeGenerator {
        reply: Reply,
        calls: Mutex<Vec<(String, String, String)>>,
    }

    impl FakeGenerator {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl StructuredGenerator for FakeGenerator {
        async fn generate_structured(
            &self,
            instructions: &str,
            input: &str,
            _schema: &Value,
            schema_name: &str,
        ) -> vox_llm::Result<StructuredOutput> {
            self.calls.lock().unwrap().push((
                instructions.to_string(),
                input.to_string(),
                schema_name.to_string(),
            ));
            match &self.reply {
                Reply::Json(value) => Ok(StructuredOutput {
                    json: value.as_object().cloned().unwrap_or_else(Map::new),
                    raw: value.to_string(),
                    model: "gpt-5".to_string(),
                }),
                Reply::Fail(make) => Err(make()),
                Reply::Panic => panic!("provider adapter exploded"),
            }
        }
    }

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

    fn ai_reply() -> Value {
        json!({
            "working_title": "Setia di Tengah Zaman",
            "opening_hook": "Pernah merasa lelah untuk tetap setia?",
            "rundown": [
                { "segment": "Intro", "minutes": 3, "goal": "Kenalan" },
                { "segment": "Inti", "minutes": 20, "goal": "Bahas kesetiaan" },
                { "segment": "Tutup", "minutes": 5, "goal": "Refleksi" }
            ],
            "questions": [
                { "q": "Apa arti setia?", "followups": ["Contohnya?"] },
                { "q": "Kenapa sulit setia?", "followups": ["Apa pemicunya?"] },
                { "q": "Bagaimana memulai?", "followups": ["Langkah kecil?"] },
                { "q": "Apa pesan penutup?", "followups": ["Satu kalimat?"] }
            ],
            "moment_targets": [
                { "label": "One-liner", "why": "Mudah dipotong", "where": "Inti" },
                { "label": "Cerita", "why": "Menyentuh emosi", "where": "Intro" }
            ],
            "closing_cta": "Bagikan ke satu teman."
        })
    }

    fn enabled_config() -> OpenAIConfig {
        OpenAIConfig::default().with_api_key("sk-test")
    }

    fn assert_fallback(envelope: &GenerationEnvelope) {
        assert!(envelope.ok);
        assert_eq!(envelope.pack_type, "pre");
        assert_eq!(envelope.version, PackVersion::Dummy);
        assert!(!envelope.ai.used);
        assert_eq!(envelope.prepack, fallback::generate_deterministic(&envelope.input));
        assert_eq!(schema::validate(&envelope.prepack), Ok(()));
        assert_eq!(envelope.markdown, markdown::render_result(&envelope.prepack));
    }

    #[tokio::test]
    async fn disabled_flag_skips_the_client() {
        let fake = FakeGenerator::new(Reply::Json(ai_reply()));
        let generator =
            PrepackGenerator::with_client(enabled_config().with_enabled(false), fake.clone());

        let envelope = generator.generate(brief()).await;

        assert_fallback(&envelope);
        assert_eq!(envelope.ai.reason.as_deref(), Some(AI_SKIPPED_REASON));
        assert_eq!(envelope.ai.error, None);
        assert!(fake.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_key_skips_the_client() {
        let fake = FakeGenerator::new(Reply::Json(ai_reply()));
        let generator = PrepackGenerator::with_client(OpenAIConfig::default(), fake.clone());

        let envelope = generator.generate(brief()).await;

        assert_fallback(&envelope);
        assert!(envelope.ai.reason.is_some());
        assert!(fake.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn valid_reply_produces_ai_envelope() {
        let fake = FakeGenerator::new(Reply::Json(ai_reply()));
        let generator = PrepackGenerator::with_client(enabled_config(), fake.clone());

        let envelope = generator.generate(brief()).await;

        assert_eq!(envelope.version, PackVersion::Ai);
        assert_eq!(envelope.ai, AiStatus::used("gpt-5"));
        assert_eq!(envelope.prepack.working_title, "Setia di Tengah Zaman");
        assert!(envelope.markdown.contains("- **Inti** (20m): Bahas kesetiaan"));

        let calls = fake.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (instructions, user_message, schema_name) = &calls[0];
        assert!(instructions.contains("hangat, ramah, membumi"));
        assert!(user_message.starts_with("Topik: Kesetiaan"));
        assert_eq!(schema_name, "vox_prepack_v1");
    }

    #[tokio::test]
    async fn upstream_error_falls_back_with_message() {
        let fake = FakeGenerator::new(Reply::Fail(|| LLMError::UpstreamHttp {
            status: 500,
            body: "internal".to_string(),
        }));
        let generator = PrepackGenerator::with_client(enabled_config(), fake);

        let envelope = generator.generate(brief()).await;

        assert_fallback(&envelope);
        let error = envelope.ai.error.as_deref().unwrap();
        assert!(error.contains("HTTP 500"));
        assert!(error.contains("internal"));
        assert_eq!(envelope.ai.reason, None);
    }

    #[tokio::test]
    async fn malformed_reply_falls_back() {
        let fake = FakeGenerator::new(Reply::Fail(|| {
            LLMError::MalformedResponse("Failed to parse model JSON output.".to_string())
        }));
        let generator = PrepackGenerator::with_client(enabled_config(), fake);

        let envelope = generator.generate(brief()).await;

        assert_fallback(&envelope);
        assert!(envelope.ai.error.unwrap().contains("Failed to parse"));
    }

    #[tokio::test]
    async fn schema_violation_falls_back() {
        let mut reply = ai_reply();
        reply["questions"] = json!([{ "q": "Hanya satu?", "followups": ["Ya?"] }]);
        let fake = FakeGenerator::new(Reply::Json(reply));
        let generator = PrepackGenerator::with_client(enabled_config(), fake);

        let envelope = generator.generate(brief()).await;

        assert_fallback(&envelope);
        let error = envelope.ai.error.unwrap();
        assert!(error.contains("questions"), "unexpected error: {error}");
    }

    #[tokio::test]
    async fn panic_in_client_falls_back() {
        let fake = FakeGenerator::new(Reply::Panic);
        let generator = PrepackGenerator::with_client(enabled_config(), fake);

        let envelope = generator.generate(brief()).await;

        assert_fallback(&envelope);
        assert!(envelope.ai.error.unwrap().contains("provider adapter exploded"));
    }

    #[tokio::test]
    async fn envelope_echoes_input() {
        let generator = PrepackGenerator::with_client(
            OpenAIConfig::default(),
            FakeGenerator::new(Reply::Json(ai_reply())),
        );
        let envelope = generator.generate(brief()).await;
        assert_eq!(envelope.input, brief());
    }

    #[test]
    fn panic_message_reads_string_payloads() {
        let owned: Box<dyn Any + Send> = Box::new("owned".to_string());
        let borrowed: Box<dyn Any + Send> = Box::new("borrowed");
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(borrowed.as_ref()), "borrowed");
        assert_eq!(panic_message(other.as_ref()), "panic with non-string payload");
    }
}
