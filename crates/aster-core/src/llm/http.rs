use super::message::Message;
use crate::error::{AsterError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `{role, content}` as chat providers expect it.
#[derive(Debug, Serialize)]
pub(crate) struct WireMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

pub(crate) fn wire_messages(messages: &[Message]) -> Vec<WireMessage<'_>> {
    messages
        .iter()
        .map(|m| WireMessage {
            role: m.role().provider_role(),
            content: m.content(),
        })
        .collect()
}

/// OpenAI-style `/chat/completions` response, shared by the cloud backends.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    pub fn into_text(self, backend: &str) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AsterError::backend(backend, "No response from API"))
    }
}

/// POST a JSON body and return the response text, mapping transport failures
/// and non-success statuses to `Backend` errors.
pub(crate) fn post_json<B: Serialize>(
    client: &reqwest::blocking::Client,
    backend: &str,
    url: &str,
    api_key: Option<&str>,
    timeout: Duration,
    body: &B,
) -> Result<String> {
    let mut request = client.post(url).timeout(timeout).json(body);
    if let Some(key) = api_key {
        request = request.bearer_auth(key);
    }

    let response = request
        .send()
        .map_err(|e| AsterError::backend(backend, format!("Request failed: {e}")))?;

    let status = response.status();
    let text = response
        .text()
        .map_err(|e| AsterError::backend(backend, format!("Failed to read response: {e}")))?;

    if !status.is_success() {
        return Err(AsterError::backend(
            backend,
            format!("API error ({status}): {text}"),
        ));
    }
    Ok(text)
}

pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(backend: &str, text: &str) -> Result<T> {
    serde_json::from_str(text)
        .map_err(|e| AsterError::backend(backend, format!("Failed to parse response: {e}")))
}
