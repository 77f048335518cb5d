//! Command trait definition for the CLI.

use anyhow::Result;

/// Trait implemented by runnable CLI commands.
///
/// The `command_line` parameter holds the full invocation, for logging.
pub trait Command {
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self, command_line: &str) -> Result<()>;
}
