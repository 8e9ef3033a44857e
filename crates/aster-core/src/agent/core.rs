use crate::constants::defaults;
use crate::context::{ConversationHistory, HistoryEntry};
use crate::error::{AsterError, Result};
use crate::llm::{
    GenerationOptions, Message, ModelBackend, ResponseFormat, VariantRegistry,
};

/// A single-backend conversational agent.
///
/// Every `ask` sends `[system, user]` to the bound backend and, on success,
/// records that batch and the reply as one exchange. Options are forwarded
/// only as far as the backend's variant accepts them; a backend whose variant
/// is not in the registry is refused before anything is sent.
pub struct ConversationAgent {
    backend: Box<dyn ModelBackend>,
    registry: VariantRegistry,
    system_prompt: String,
    options: GenerationOptions,
    history: ConversationHistory,
}

impl ConversationAgent {
    pub fn new(backend: impl ModelBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            registry: VariantRegistry::builtin(),
            system_prompt: defaults::SYSTEM_PROMPT.to_string(),
            options: GenerationOptions {
                temperature: Some(defaults::TEMPERATURE),
                max_tokens: Some(defaults::MAX_TOKENS),
                format: None,
            },
            history: ConversationHistory::new(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.options.max_tokens = Some(max);
        self
    }

    pub fn with_format(mut self, format: Option<ResponseFormat>) -> Self {
        self.options.format = format;
        self
    }

    pub fn with_registry(mut self, registry: VariantRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn backend_variant(&self) -> &str {
        self.backend.variant()
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    /// Flattened history: system, user, agent-reply for each exchange.
    pub fn messages(&self) -> Vec<Message> {
        self.history.messages()
    }

    /// Ask the bound backend and return its raw reply text.
    ///
    /// History is untouched unless the backend answers.
    pub fn ask(&mut self, prompt: impl Into<String>) -> Result<String> {
        let variant = self.backend.variant();
        let accepted = self.registry.accepted(variant).ok_or_else(|| {
            AsterError::config(format!(
                "Unknown backend variant '{variant}' (known: {})",
                self.registry.names().join(", ")
            ))
        })?;

        let batch = vec![
            Message::system(self.system_prompt.as_str()),
            Message::user(prompt),
        ];
        let options = self.options.restricted_to(accepted);

        tracing::debug!(variant, ?options, "dispatching prompt");
        let reply = self.backend.ask(&batch, &options).map_err(|e| {
            tracing::warn!(variant, "backend call failed: {e}");
            e
        })?;

        self.history
            .record_exchange(batch, Message::agent_reply(reply.as_str()));
        Ok(reply)
    }
}

impl std::fmt::Debug for ConversationAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationAgent")
            .field("variant", &self.backend.variant())
            .field("system_prompt", &self.system_prompt)
            .field("options", &self.options)
            .field("history_len", &self.history.len())
            .finish()
    }
}
