use aster_core::{ConversationHistory, HistoryEntry};

/// Result of processing a slash command in the chat REPL.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Print the conversation so far.
    ShowHistory,
    /// Print the agent's system prompt.
    ShowSystem,
    /// Quit the REPL.
    Quit,
    /// Not a command - send as a prompt.
    NotACommand,
}

pub fn handle_command(input: &str) -> CommandResult {
    let input = input.trim();
    let cmd = input.split_whitespace().next().unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,
        "/history" => CommandResult::ShowHistory,
        "/system" => CommandResult::ShowSystem,
        "/version" => CommandResult::Message(format!("Aster CLI v{}", env!("CARGO_PKG_VERSION"))),

        _ => {
            if input.starts_with('/') {
                CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands."))
            } else {
                CommandResult::NotACommand
            }
        }
    }
}

fn show_help() -> CommandResult {
    let help_text = "\
Aster chat commands

  /history           Show the conversation so far
  /system            Show the system prompt
  /version           Show version information
  /help, /h          Show this help message
  /exit, /quit, /q   Leave the chat

Anything else is sent to the model.";

    CommandResult::Message(help_text.into())
}

/// One line per message, `[role] content`, with a blank line between exchanges.
pub fn render_history(history: &ConversationHistory) -> String {
    if history.is_empty() {
        return "(no messages yet)".into();
    }

    let mut out = String::new();
    for entry in history.entries() {
        for message in entry.messages() {
            out.push_str(&format!("[{}] {}\n", message.role(), message.content()));
        }
        if matches!(entry, HistoryEntry::Reply(_)) {
            out.push('\n');
        }
    }
    out.trim_end().to_string()
}
