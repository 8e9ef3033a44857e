mod groq;
mod http;
mod message;
mod ollama;
mod openai;
mod registry;
mod traits;

pub use groq::GroqBackend;
pub use message::{create_prompt, Message, Role};
pub use ollama::OllamaBackend;
pub use openai::OpenAIBackend;
pub use registry::VariantRegistry;
pub use traits::*;
