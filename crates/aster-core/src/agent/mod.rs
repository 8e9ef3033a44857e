mod core;

pub use core::ConversationAgent;
