use anyhow::{Context, Result};
use aster_core::{ConversationAgent, DataStore, Settings};
use std::io::{BufRead, Write};

use crate::commands::{handle_command, render_history, CommandResult};

/// Columns of the account table the CLI creates before signup/login.
pub const USERS_SCHEMA: [(&str, &str); 3] = [
    ("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
    ("email", "TEXT NOT NULL UNIQUE"),
    ("password", "TEXT NOT NULL"),
];

pub fn run_single_prompt(settings: &Settings, prompt: &str) -> Result<()> {
    let mut agent = settings.build_agent()?;
    let reply = agent.ask(prompt)?;
    println!("{reply}");
    Ok(())
}

pub fn run_chat(settings: &Settings) -> Result<()> {
    let mut agent = settings.build_agent()?;
    eprintln!(
        "Aster chat ({}). Type /help for commands, /exit to leave.",
        agent.backend_variant()
    );
    let stdin = std::io::stdin();
    chat_loop(&mut agent, stdin.lock(), std::io::stdout())
}

/// Read lines from `input` until EOF or `/exit`, answering prompts and slash
/// commands on `output`. A failed ask is reported and the loop continues.
pub fn chat_loop<R: BufRead, W: Write>(
    agent: &mut ConversationAgent,
    mut input: R,
    mut output: W,
) -> Result<()> {
    let mut line = String::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        match handle_command(text) {
            CommandResult::Quit => break,
            CommandResult::Message(msg) => writeln!(output, "{msg}")?,
            CommandResult::ShowHistory => writeln!(output, "{}", render_history(agent.history()))?,
            CommandResult::ShowSystem => writeln!(output, "{}", agent.system_prompt())?,
            CommandResult::NotACommand => match agent.ask(text) {
                Ok(reply) => writeln!(output, "{reply}")?,
                Err(e) => writeln!(output, "Error: {e}")?,
            },
        }
    }
    Ok(())
}

fn open_users_table(settings: &Settings, table: &str) -> Result<DataStore> {
    let store = settings
        .open_store()
        .with_context(|| format!("opening database {}", settings.database.path))?;
    store.create_table(table, USERS_SCHEMA)?;
    tracing::debug!(table, db = %settings.database.path, "account table ready");
    Ok(store)
}

pub fn run_signup(settings: &Settings, table: &str, email: &str, password: &str) -> Result<bool> {
    let store = open_users_table(settings, table)?;
    let credentials = settings.credential_store(&store)?;
    Ok(credentials.signup(table, email, password)?)
}

pub fn run_login(settings: &Settings, table: &str, email: &str, password: &str) -> Result<bool> {
    let store = open_users_table(settings, table)?;
    let credentials = settings.credential_store(&store)?;
    Ok(credentials.login(table, email, password)?)
}

pub fn run_fetch(url: &str) -> Result<()> {
    let text = aster_core::web::fetch_text(url)?;
    println!("{text}");
    Ok(())
}

/// Password from the flag, or one line from stdin when the flag is absent.
pub fn read_password(flag: Option<String>) -> Result<String> {
    if let Some(password) = flag {
        return Ok(password);
    }
    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("No password given");
    }
    Ok(password)
}
