pub mod agent;
pub mod auth;
pub mod config;
pub mod constants;
pub mod context;
pub mod db;
pub mod error;
pub mod llm;
pub mod web;

// Re-export key types
pub use agent::ConversationAgent;
pub use auth::{CredentialHasher, CredentialStore, EmailMatch};
pub use config::{LlmProvider, Settings};
pub use context::{ConversationHistory, HistoryEntry};
pub use db::{DataStore, Filter, QueryBuilder, Row, Value};
pub use error::{AsterError, Result};
pub use llm::{
    create_prompt, AcceptedOptions, GenerationOptions, GroqBackend, Message, ModelBackend,
    OllamaBackend, OpenAIBackend, ResponseFormat, Role, VariantRegistry,
};
