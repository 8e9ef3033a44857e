use super::http::{parse_json, post_json, wire_messages, ChatCompletionResponse, WireMessage};
use super::message::Message;
use super::traits::{GenerationOptions, ModelBackend};
use crate::constants::{defaults, endpoints, models, variants};
use crate::error::Result;
use serde::Serialize;
use std::time::Duration;

/// OpenAI completions.
///
/// Sampling is part of the backend instance: `ask` ignores the options it is
/// handed and always sends the model, temperature and max tokens configured
/// here.
pub struct OpenAIBackend {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl OpenAIBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_key: api_key.into(),
            model: models::DEFAULT_OPENAI_MODEL.to_string(),
            base_url: endpoints::OPENAI_BASE_URL.to_string(),
            temperature: None,
            max_tokens: None,
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

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ModelBackend for OpenAIBackend {
    fn variant(&self) -> &str {
        variants::OPENAI
    }

    fn ask(&self, messages: &[Message], _options: &GenerationOptions) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));
        let body = OpenAIRequest {
            model: &self.model,
            messages: wire_messages(messages),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        tracing::debug!(model = %self.model, messages = messages.len(), "openai completion");
        let text = post_json(
            &self.client,
            variants::OPENAI,
            &url,
            Some(self.api_key.as_str()),
            self.timeout,
            &body,
        )?;
        let response: ChatCompletionResponse = parse_json(variants::OPENAI, &text)?;
        response.into_text(variants::OPENAI)
    }
}
