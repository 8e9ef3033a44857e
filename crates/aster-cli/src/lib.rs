// Library interface for aster-cli
// This allows integration tests to access internal modules

// NOTE: commands.rs and app.rs are also declared in main.rs, so the path
// attribute points at the same source files.

#[path = "commands.rs"]
pub mod commands;

#[path = "app.rs"]
pub mod app;

// Re-export commonly used items for easier testing
pub use app::chat_loop;
pub use commands::{handle_command, render_history, CommandResult};
