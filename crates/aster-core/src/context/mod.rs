mod history;

pub use history::{ConversationHistory, HistoryEntry};
