use anyhow::Result;
use aster_core::{LlmProvider, Settings};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod app;
mod commands;

#[derive(Parser)]
#[command(name = "aster")]
#[command(about = "Aster - chat with local or hosted LLMs, manage accounts in SQLite")]
#[command(version)]
struct Cli {
    /// Settings file (default: <config dir>/aster/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file, overriding the settings
    #[arg(long, global = true)]
    db: Option<String>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send one prompt and print the reply
    Ask {
        prompt: String,

        /// LLM provider (ollama, groq, openai)
        #[arg(long)]
        provider: Option<String>,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,

        /// System prompt
        #[arg(short, long)]
        system: Option<String>,

        /// Ask for a JSON reply
        #[arg(long)]
        json: bool,
    },
    /// Interactive chat
    Chat {
        #[arg(long)]
        provider: Option<String>,

        #[arg(short, long)]
        model: Option<String>,

        #[arg(short, long)]
        system: Option<String>,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        email: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,

        /// Account table (default from settings)
        #[arg(long)]
        table: Option<String>,
    },
    /// Check an email/password pair
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: Option<String>,

        #[arg(long)]
        table: Option<String>,
    },
    /// Print the visible text of a web page
    Fetch { url: String },
}

fn apply_llm_overrides(
    settings: &mut Settings,
    provider: Option<String>,
    model: Option<String>,
    system: Option<String>,
) -> Result<()> {
    if let Some(provider) = provider {
        let provider: LlmProvider = provider.parse()?;
        if provider != settings.llm.provider {
            // Model and endpoint belong to the previous provider.
            settings.llm.model.clear();
            settings.llm.base_url = None;
            settings.llm.api_key_env.clear();
        }
        settings.llm.provider = provider;
    }
    if let Some(model) = model {
        settings.llm.model = model;
    }
    if let Some(system) = system {
        settings.agent.system_prompt = system;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut settings = match cli.config {
        Some(ref path) => Settings::load_from(path)?,
        None => Settings::load(),
    };
    if let Some(db) = cli.db {
        settings.database.path = db;
    }

    match cli.command {
        Command::Ask {
            prompt,
            provider,
            model,
            system,
            json,
        } => {
            apply_llm_overrides(&mut settings, provider, model, system)?;
            if json {
                settings.agent.format = "json".into();
            }
            app::run_single_prompt(&settings, &prompt)?;
        }
        Command::Chat {
            provider,
            model,
            system,
        } => {
            apply_llm_overrides(&mut settings, provider, model, system)?;
            app::run_chat(&settings)?;
        }
        Command::Signup {
            email,
            password,
            table,
        } => {
            let table = table.unwrap_or_else(|| settings.auth.users_table.clone());
            let password = app::read_password(password)?;
            if app::run_signup(&settings, &table, &email, &password)? {
                println!("Account created for {email}");
            } else {
                println!("{email} is already registered");
                std::process::exit(1);
            }
        }
        Command::Login {
            email,
            password,
            table,
        } => {
            let table = table.unwrap_or_else(|| settings.auth.users_table.clone());
            let password = app::read_password(password)?;
            if app::run_login(&settings, &table, &email, &password)? {
                println!("Login ok");
            } else {
                println!("Invalid email or password");
                std::process::exit(1);
            }
        }
        Command::Fetch { url } => app::run_fetch(&url)?,
    }

    Ok(())
}
