use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;

use crate::config::OpenAIConfig;
use crate::protocol::responses::{extract_output_text, ResponsesRequest};
use crate::provider::{LLMError, Result, StructuredGenerator, StructuredOutput};

/// Client for the OpenAI Responses API with strict json_schema output.
pub struct ResponsesClient {
    client: Client,
    config: OpenAIConfig,
}

impl ResponsesClient {
    /// Build a client whose every request is bounded by the configured timeout.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    pub fn build_request_body(
        &self,
        instructions: &str,
        input: &str,
        schema: &Value,
        schema_name: &str,
    ) -> ResponsesRequest {
        ResponsesRequest::structured(&self.config, instructions, input, schema, schema_name)
    }
}

#[async_trait]
impl StructuredGenerator for ResponsesClient {
    async fn generate_structured(
        &self,
        instructions: &str,
        input: &str,
        schema: &Value,
        schema_name: &str,
    ) -> Result<StructuredOutput> {
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| LLMError::Configuration("OPENAI_API_KEY is not set.".to_string()))?;

        let body = self.build_request_body(instructions, input, schema, schema_name);
        let url = self.config.responses_url();

        log::debug!(
            "Sending structured request to {} (model: {}, schema: {}, reasoning: {})",
            url,
            body.model,
            schema_name,
            body.reasoning.is_some()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            log::warn!("Responses API returned HTTP {}", status.as_u16());
            return Err(LLMError::UpstreamHttp {
                status: status.as_u16(),
                body: text,
            });
        }

        // A body that is not JSON carries no output text.
        let data: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
        let raw = extract_output_text(&data);

        let json = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(LLMError::MalformedResponse(
                    "Failed to parse model JSON output: not an object.".to_string(),
                ))
            }
            Err(e) => {
                return Err(LLMError::MalformedResponse(format!(
                    "Failed to parse model JSON output: {}",
                    e
                )))
            }
        };

        log::debug!("Structured reply parsed ({} bytes of text)", raw.len());

        Ok(StructuredOutput {
            json,
            raw,
            model: self.config.model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_client_keeps_config() {
        let client = ResponsesClient::new(
            OpenAIConfig::default()
                .with_api_key("sk-test")
                .with_model("gpt-4o"),
        )
        .unwrap();
        assert_eq!(client.config().model, "gpt-4o");
        assert_eq!(client.config().api_key(), Some("sk-test"));
    }

    #[test]
    fn test_request_url_construction() {
        let client = ResponsesClient::new(
            OpenAIConfig::default().with_base_url("https://api.custom.com/"),
        )
        .unwrap();
        assert_eq!(
            client.config().responses_url(),
            "https://api.custom.com/v1/responses"
        );
    }

    #[test]
    fn test_request_body_for_default_model() {
        let client = ResponsesClient::new(OpenAIConfig::default()).unwrap();
        let body = client.build_request_body("sys", "user", &json!({ "type": "object" }), "pack");
        let body = serde_json::to_value(body).unwrap();

        assert_eq!(body["model"], "gpt-5");
        assert_eq!(body["reasoning"]["effort"], "medium");
        assert!(body.get("temperature").is_none());
        assert_eq!(body["text"]["format"]["name"], "pack");
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let client = ResponsesClient::new(OpenAIConfig::default()).unwrap();
        let err = client
            .generate_structured("sys", "user", &json!({}), "pack")
            .await
            .unwrap_err();
        assert!(matches!(err, LLMError::Configuration(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_upstream_error_message_carries_status_and_body() {
        let err = LLMError::UpstreamHttp {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "OpenAI request failed: HTTP 500 — boom");
    }
}
