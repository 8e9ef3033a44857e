use aster_cli::app::{run_login, run_signup};
use aster_cli::chat_loop;
use aster_core::{
    AcceptedOptions, AsterError, ConversationAgent, GenerationOptions, Message, ModelBackend,
    Settings, VariantRegistry,
};
use tempfile::TempDir;

/// Replies with the last user message, upper-cased. Fails on "boom".
struct ShoutBackend;

impl ModelBackend for ShoutBackend {
    fn variant(&self) -> &str {
        "shout"
    }

    fn ask(
        &self,
        messages: &[Message],
        _options: &GenerationOptions,
    ) -> aster_core::Result<String> {
        let prompt = messages.last().map(|m| m.content()).unwrap_or_default();
        if prompt == "boom" {
            return Err(AsterError::backend("shout", "exploded"));
        }
        Ok(prompt.to_uppercase())
    }
}

fn shout_agent() -> ConversationAgent {
    ConversationAgent::new(ShoutBackend)
        .with_system_prompt("test system")
        .with_registry(VariantRegistry::builtin().with("shout", AcceptedOptions::ALL))
}

fn run(agent: &mut ConversationAgent, input: &str) -> String {
    let mut out = Vec::new();
    chat_loop(agent, input.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

// --- CHAT LOOP ---

#[test]
fn test_chat_loop_answers_prompts() {
    let mut agent = shout_agent();
    let out = run(&mut agent, "hello\n/exit\nnever sent\n");

    assert!(out.contains("HELLO"));
    assert!(!out.contains("NEVER SENT"));
    assert_eq!(agent.history().exchanges(), 1);
}

#[test]
fn test_chat_loop_stops_at_eof() {
    let mut agent = shout_agent();
    run(&mut agent, "one\ntwo");
    assert_eq!(agent.history().exchanges(), 2);
}

#[test]
fn test_chat_loop_skips_blank_lines() {
    let mut agent = shout_agent();
    run(&mut agent, "\n   \n\n");
    assert!(agent.history().is_empty());
}

#[test]
fn test_chat_loop_reports_errors_and_continues() {
    let mut agent = shout_agent();
    let out = run(&mut agent, "boom\nafter\n");

    assert!(out.contains("Error: Backend error: shout: exploded"));
    assert!(out.contains("AFTER"));
    assert_eq!(agent.history().exchanges(), 1);
}

#[test]
fn test_chat_loop_history_and_system_commands() {
    let mut agent = shout_agent();
    let out = run(&mut agent, "hi\n/history\n/system\n/q\n");

    assert!(out.contains("[user] hi"));
    assert!(out.contains("[agent-reply] HI"));
    assert!(out.contains("test system"));
    // Slash commands never reach the backend.
    assert_eq!(agent.history().exchanges(), 1);
}

// --- SIGNUP / LOGIN ---

fn fast_settings(dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.database.path = dir.path().join("users.db").to_string_lossy().into_owned();
    settings.auth.argon2_memory_kib = 1024;
    settings.auth.argon2_iterations = 1;
    settings.auth.argon2_parallelism = 1;
    settings
}

#[test]
fn test_signup_then_login_persists_across_opens() {
    let dir = TempDir::new().unwrap();
    let settings = fast_settings(&dir);

    assert!(run_signup(&settings, "users", "a@x.com", "p1").unwrap());
    assert!(!run_signup(&settings, "users", "a@x.com", "p2").unwrap());

    assert!(run_login(&settings, "users", "a@x.com", "p1").unwrap());
    assert!(!run_login(&settings, "users", "a@x.com", "p2").unwrap());
    assert!(!run_login(&settings, "users", "b@x.com", "p1").unwrap());
}

#[test]
fn test_login_against_fresh_database_is_false() {
    let dir = TempDir::new().unwrap();
    let settings = fast_settings(&dir);

    assert!(!run_login(&settings, "accounts", "a@x.com", "p1").unwrap());
}
