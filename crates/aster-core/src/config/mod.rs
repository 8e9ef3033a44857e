use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::agent::ConversationAgent;
use crate::auth::{CredentialHasher, CredentialStore, EmailMatch};
use crate::constants::{defaults, endpoints, models};
use crate::db::DataStore;
use crate::error::{AsterError, Result};
use crate::llm::{GroqBackend, ModelBackend, OllamaBackend, OpenAIBackend, ResponseFormat};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub llm: LlmSettings,
    pub agent: AgentSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    /// Empty means the provider's default model.
    pub model: String,
    /// Empty means the provider's conventional variable.
    pub api_key_env: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Ollama,
    Groq,
    OpenAI,
}

impl LlmProvider {
    pub fn name(&self) -> &str {
        match self {
            Self::Ollama => "ollama",
            Self::Groq => "groq",
            Self::OpenAI => "openai",
        }
    }

    pub fn default_api_key_env(&self) -> &str {
        match self {
            Self::Ollama => "",
            Self::Groq => "GROQ_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
        }
    }

    pub fn default_model(&self) -> &str {
        match self {
            Self::Ollama => models::DEFAULT_OLLAMA_MODEL,
            Self::Groq => models::DEFAULT_GROQ_MODEL,
            Self::OpenAI => models::DEFAULT_OPENAI_MODEL,
        }
    }

    pub fn default_base_url(&self) -> &str {
        match self {
            Self::Ollama => endpoints::OLLAMA_BASE_URL,
            Self::Groq => endpoints::GROQ_BASE_URL,
            Self::OpenAI => endpoints::OPENAI_BASE_URL,
        }
    }
}

impl FromStr for LlmProvider {
    type Err = AsterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "groq" => Ok(Self::Groq),
            "openai" => Ok(Self::OpenAI),
            other => Err(AsterError::config(format!(
                "Unknown provider '{other}' (expected ollama, groq or openai)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// `""`, `"json"`, or an inline JSON Schema.
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub users_table: String,
    pub email_match: EmailMatch,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
    pub argon2_parallelism: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Ollama, // no key needed for a local server
            model: String::new(),
            api_key_env: String::new(),
            base_url: None,
            timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            system_prompt: defaults::SYSTEM_PROMPT.to_string(),
            temperature: defaults::TEMPERATURE,
            max_tokens: defaults::MAX_TOKENS,
            format: String::new(),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: defaults::DATABASE_PATH.to_string(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            users_table: defaults::USERS_TABLE.to_string(),
            email_match: EmailMatch::Exact,
            argon2_memory_kib: argon2::Params::DEFAULT_M_COST,
            argon2_iterations: argon2::Params::DEFAULT_T_COST,
            argon2_parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl LlmSettings {
    pub fn model(&self) -> &str {
        if self.model.is_empty() {
            self.provider.default_model()
        } else {
            &self.model
        }
    }

    pub fn api_key_env(&self) -> &str {
        if self.api_key_env.is_empty() {
            self.provider.default_api_key_env()
        } else {
            &self.api_key_env
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("aster")
            .join("config.toml")
    }

    /// Settings from the default location, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match Self::load_from(&config_path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {e}", config_path.display());
                Self::default()
            }
        }
    }

    /// Settings from `path`. A missing file gives defaults; a malformed one is
    /// an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(Self::config_path())
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// API key from the environment variable named in the settings.
    pub fn api_key(&self) -> Option<String> {
        let var = self.llm.api_key_env();
        if var.is_empty() {
            return None;
        }
        std::env::var(var).ok().filter(|k| !k.is_empty())
    }

    fn require_api_key(&self) -> Result<String> {
        self.api_key().ok_or_else(|| {
            AsterError::config(format!(
                "Set {} environment variable for {}",
                self.llm.api_key_env(),
                self.llm.provider.name()
            ))
        })
    }

    /// Build the backend selected by `llm.provider`.
    pub fn build_backend(&self) -> Result<Box<dyn ModelBackend>> {
        let timeout = Duration::from_secs(self.llm.timeout_secs);
        let model = self.llm.model();
        let base_url = self.llm.base_url();

        let backend: Box<dyn ModelBackend> = match self.llm.provider {
            LlmProvider::Ollama => Box::new(
                OllamaBackend::new(model)
                    .with_base_url(base_url)
                    .with_timeout(timeout),
            ),
            LlmProvider::Groq => Box::new(
                GroqBackend::new(self.require_api_key()?)
                    .with_model(model)
                    .with_base_url(base_url)
                    .with_timeout(timeout),
            ),
            // Completion sampling is fixed on the instance, not per call.
            LlmProvider::OpenAI => Box::new(
                OpenAIBackend::new(self.require_api_key()?)
                    .with_model(model)
                    .with_base_url(base_url)
                    .with_temperature(self.agent.temperature)
                    .with_max_tokens(self.agent.max_tokens)
                    .with_timeout(timeout),
            ),
        };
        tracing::info!(provider = self.llm.provider.name(), model, "LLM backend ready");
        Ok(backend)
    }

    pub fn build_agent(&self) -> Result<ConversationAgent> {
        let format = ResponseFormat::parse(&self.agent.format)?;
        Ok(ConversationAgent::new(self.build_backend()?)
            .with_system_prompt(self.agent.system_prompt.as_str())
            .with_temperature(self.agent.temperature)
            .with_max_tokens(self.agent.max_tokens)
            .with_format(format))
    }

    pub fn open_store(&self) -> Result<DataStore> {
        DataStore::open(&self.database.path)
    }

    pub fn credential_hasher(&self) -> Result<CredentialHasher> {
        CredentialHasher::with_params(
            self.auth.argon2_memory_kib,
            self.auth.argon2_iterations,
            self.auth.argon2_parallelism,
        )
    }

    pub fn credential_store<'a>(&self, store: &'a DataStore) -> Result<CredentialStore<'a>> {
        Ok(CredentialStore::new(store)
            .with_hasher(self.credential_hasher()?)
            .with_email_match(self.auth.email_match))
    }
}
