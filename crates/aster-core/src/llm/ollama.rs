use super::http::{parse_json, post_json, wire_messages, WireMessage};
use super::message::Message;
use super::traits::{GenerationOptions, ModelBackend, ResponseFormat};
use crate::constants::{defaults, endpoints, variants};
use crate::error::{AsterError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Local Ollama server, `/api/chat` without streaming.
///
/// Recognizes `temperature` and `format`.
pub struct OllamaBackend {
    client: reqwest::blocking::Client,
    model: String,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

impl OllamaBackend {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            model: model.into(),
            base_url: endpoints::OLLAMA_BASE_URL.to_string(),
            timeout: Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
        }
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

    fn format_value(format: &ResponseFormat) -> Value {
        match format {
            ResponseFormat::Json => Value::String("json".into()),
            ResponseFormat::Schema(schema) => schema.clone(),
        }
    }
}

impl ModelBackend for OllamaBackend {
    fn variant(&self) -> &str {
        variants::OLLAMA
    }

    fn ask(&self, messages: &[Message], options: &GenerationOptions) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let body = OllamaChatRequest {
            model: &self.model,
            messages: wire_messages(messages),
            stream: false,
            format: options.format.as_ref().map(Self::format_value),
            options: options.temperature.map(|temperature| OllamaOptions { temperature }),
        };

        tracing::debug!(model = %self.model, messages = messages.len(), "ollama chat");
        let text = post_json(&self.client, variants::OLLAMA, &url, None, self.timeout, &body)?;
        let response: OllamaChatResponse = parse_json(variants::OLLAMA, &text)?;

        response
            .message
            .map(|m| m.content)
            .ok_or_else(|| AsterError::backend(variants::OLLAMA, "No message in response"))
    }
}
