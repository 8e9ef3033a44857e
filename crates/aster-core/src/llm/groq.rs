use super::http::{parse_json, post_json, wire_messages, ChatCompletionResponse, WireMessage};
use super::message::Message;
use super::traits::{GenerationOptions, ModelBackend, ResponseFormat};
use crate::constants::{defaults, endpoints, models, variants};
use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Groq's OpenAI-compatible chat completions API.
///
/// Recognizes `temperature`, `max_tokens` and `format`.
pub struct GroqBackend {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct GroqRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

impl GroqBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_key: api_key.into(),
            model: models::DEFAULT_GROQ_MODEL.to_string(),
            base_url: endpoints::GROQ_BASE_URL.to_string(),
            timeout: Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn response_format(format: &ResponseFormat) -> Value {
        match format {
            ResponseFormat::Json => serde_json::json!({ "type": "json_object" }),
            ResponseFormat::Schema(schema) => serde_json::json!({
                "type": "json_schema",
                "json_schema": { "name": "response", "schema": schema },
            }),
        }
    }
}

impl ModelBackend for GroqBackend {
    fn variant(&self) -> &str {
        variants::GROQ
    }

    fn ask(&self, messages: &[Message], options: &GenerationOptions) -> Result<String> {
        let url = format!(
            "{}/openai/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        let body = GroqRequest {
            model: &self.model,
            messages: wire_messages(messages),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            response_format: options.format.as_ref().map(Self::response_format),
        };

        tracing::debug!(model = %self.model, messages = messages.len(), "groq chat");
        let text = post_json(
            &self.client,
            variants::GROQ,
            &url,
            Some(self.api_key.as_str()),
            self.timeout,
            &body,
        )?;
        let response: ChatCompletionResponse = parse_json(variants::GROQ, &text)?;
        response.into_text(variants::GROQ)
    }
}
