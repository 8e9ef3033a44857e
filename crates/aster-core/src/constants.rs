//! Centralized constants.
//! Default endpoints, models and agent parameters live here.

// ─── Models ───────────────────────────────────────────────────────────────────

pub mod models {
    pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";
    pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
    pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
}

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";
    pub const GROQ_BASE_URL: &str = "https://api.groq.com";
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
}

// ─── Backend variant names ────────────────────────────────────────────────────

pub mod variants {
    pub const OLLAMA: &str = "ollama";
    pub const GROQ: &str = "groq";
    pub const OPENAI: &str = "openai";
}

// ─── Agent defaults ───────────────────────────────────────────────────────────

pub mod defaults {
    pub const SYSTEM_PROMPT: &str = "You are an AI Assistant.";
    pub const TEMPERATURE: f32 = 0.5;
    pub const MAX_TOKENS: u32 = 1024;
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;
    pub const DATABASE_PATH: &str = "aster.db";
    pub const USERS_TABLE: &str = "users";
    pub const USER_AGENT: &str = "Aster/0.1";
}

// ─── Web ──────────────────────────────────────────────────────────────────────

pub mod web {
    pub const FETCH_TIMEOUT_SECS: u64 = 30;
    pub const MAX_PAGE_BYTES: usize = 2_000_000;
}
