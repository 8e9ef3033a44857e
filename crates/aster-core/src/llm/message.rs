use serde::{Deserialize, Serialize};
use std::fmt;

/// Who a message is from. Unknown tags parse to `Custom` rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    System,
    User,
    Assistant,
    /// A reply recorded by a conversation agent.
    AgentReply,
    Custom(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::AgentReply => "agent-reply",
            Self::Custom(tag) => tag,
        }
    }

    /// Role name sent to chat-style providers. Agent replies are the model's
    /// own turns, so they go out as `assistant`.
    pub fn provider_role(&self) -> &str {
        match self {
            Self::AgentReply => "assistant",
            other => other.as_str(),
        }
    }
}

impl From<&str> for Role {
    fn from(tag: &str) -> Self {
        match tag {
            "system" => Self::System,
            "user" => Self::User,
            "assistant" => Self::Assistant,
            "agent-reply" => Self::AgentReply,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(tag: String) -> Self {
        Role::from(tag.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Custom(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable `{role, content}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: impl Into<Role>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn agent_reply(content: impl Into<String>) -> Self {
        Self::new(Role::AgentReply, content)
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Build a role-tagged message. Any role string is accepted.
pub fn create_prompt(role: impl Into<Role>, content: impl Into<String>) -> Message {
    Message::new(role, content)
}
