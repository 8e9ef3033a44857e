use super::message::Message;
use crate::error::{AsterError, Result};
use serde_json::Value;

/// Response-shape hint forwarded to backends that understand one.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// Any valid JSON object.
    Json,
    /// JSON matching the given JSON Schema.
    Schema(Value),
}

impl ResponseFormat {
    /// Parse a format setting. Blank and `text` mean no constraint, `json`
    /// (any case) forces JSON, and a string starting with `{` is read as a
    /// JSON Schema.
    pub fn parse(input: &str) -> Result<Option<Self>> {
        let trimmed = input.trim();
        if trimmed.starts_with('{') {
            let schema: Value = serde_json::from_str(trimmed)
                .map_err(|e| AsterError::config(format!("Invalid JSON Schema: {e}")))?;
            if schema.as_object().is_some_and(|o| o.is_empty()) {
                return Err(AsterError::config("JSON Schema must not be empty"));
            }
            return Ok(Some(Self::Schema(schema)));
        }
        match trimmed.to_lowercase().as_str() {
            "" | "text" => Ok(None),
            "json" => Ok(Some(Self::Json)),
            other => Err(AsterError::config(format!("Unknown response format: {other}"))),
        }
    }
}

/// Generation parameters an agent holds and forwards to its backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub format: Option<ResponseFormat>,
}

impl GenerationOptions {
    /// Copy with every field the backend does not accept cleared.
    pub fn restricted_to(&self, accepted: AcceptedOptions) -> Self {
        Self {
            temperature: self.temperature.filter(|_| accepted.temperature),
            max_tokens: self.max_tokens.filter(|_| accepted.max_tokens),
            format: self.format.clone().filter(|_| accepted.format),
        }
    }
}

/// Which `GenerationOptions` fields a backend variant recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptedOptions {
    pub temperature: bool,
    pub max_tokens: bool,
    pub format: bool,
}

impl AcceptedOptions {
    /// Local inference server: temperature and format.
    pub const LOCAL: Self = Self {
        temperature: true,
        max_tokens: false,
        format: true,
    };

    /// Cloud chat API: temperature, max tokens and format.
    pub const CHAT: Self = Self {
        temperature: true,
        max_tokens: true,
        format: true,
    };

    /// Cloud completion API: sampling is fixed when the backend is built.
    pub const COMPLETION: Self = Self {
        temperature: false,
        max_tokens: false,
        format: false,
    };

    pub const ALL: Self = Self::CHAT;
}

/// A model provider that turns a message batch into reply text.
///
/// Implementations block until the provider answers. Every failure (transport,
/// auth, non-success status, malformed body) is reported as
/// [`AsterError::Backend`]; nothing is retried.
pub trait ModelBackend: Send + Sync {
    /// Variant name used for dispatch, e.g. `"ollama"`.
    fn variant(&self) -> &str;

    /// Send `messages` and return the reply text. Fields of `options` this
    /// backend does not recognize are ignored.
    fn ask(&self, messages: &[Message], options: &GenerationOptions) -> Result<String>;
}

impl<T: ModelBackend + ?Sized> ModelBackend for Box<T> {
    fn variant(&self) -> &str {
        (**self).variant()
    }

    fn ask(&self, messages: &[Message], options: &GenerationOptions) -> Result<String> {
        (**self).ask(messages, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!(ResponseFormat::parse("").unwrap(), None);
        assert_eq!(ResponseFormat::parse("JSON").unwrap(), Some(ResponseFormat::Json));
        let schema = ResponseFormat::parse(r#"{"type":"object"}"#).unwrap();
        assert!(matches!(schema, Some(ResponseFormat::Schema(_))));
        assert!(ResponseFormat::parse("yaml").is_err());
    }

    #[test]
    fn test_bad_schemas_are_configuration_errors() {
        for input in ["{}", " { } ", "{not json"] {
            assert!(
                matches!(ResponseFormat::parse(input), Err(AsterError::Configuration(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn test_restricted_to_clears_unrecognized_fields() {
        let opts = GenerationOptions {
            temperature: Some(0.5),
            max_tokens: Some(1024),
            format: Some(ResponseFormat::Json),
        };

        let local = opts.restricted_to(AcceptedOptions::LOCAL);
        assert_eq!(local.temperature, Some(0.5));
        assert_eq!(local.max_tokens, None);
        assert_eq!(local.format, Some(ResponseFormat::Json));

        assert_eq!(opts.restricted_to(AcceptedOptions::CHAT), opts);
        assert_eq!(
            opts.restricted_to(AcceptedOptions::COMPLETION),
            GenerationOptions::default()
        );
    }
}
