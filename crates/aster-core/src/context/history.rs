use crate::llm::Message;

/// One half of an exchange: the batch that was sent, or the reply that came back.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    Prompt(Vec<Message>),
    Reply(Message),
}

impl HistoryEntry {
    pub fn messages(&self) -> &[Message] {
        match self {
            Self::Prompt(batch) => batch,
            Self::Reply(reply) => std::slice::from_ref(reply),
        }
    }
}

/// Append-only record of an agent's exchanges.
///
/// Entries only go in as prompt/reply pairs, so `len()` is always even.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    entries: Vec<HistoryEntry>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_exchange(&mut self, prompt: Vec<Message>, reply: Message) {
        self.entries.reserve(2);
        self.entries.push(HistoryEntry::Prompt(prompt));
        self.entries.push(HistoryEntry::Reply(reply));
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// All messages in order, batches flattened.
    pub fn messages(&self) -> Vec<Message> {
        self.entries
            .iter()
            .flat_map(|e| e.messages().iter().cloned())
            .collect()
    }

    pub fn exchanges(&self) -> usize {
        self.entries.len() / 2
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_reply(&self) -> Option<&Message> {
        match self.entries.last() {
            Some(HistoryEntry::Reply(reply)) => Some(reply),
            _ => None,
        }
    }
}
