use crate::env::Environment;
use crate::error::CommandError;
use crate::registry::CommandRegistry;
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// What the shell loop should do after a command completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Carry on with the next command.
    Continue,
    /// Stop the loop and end the process with the given status.
    Exit(ExitCode),
}

/// Everything a command may touch while it runs.
///
/// The registry is borrowed read-only so that commands such as `help` can
/// enumerate their siblings.
pub struct Context<'a> {
    pub env: &'a mut Environment,
    pub registry: &'a CommandRegistry,
    /// Where command output goes. Errors are not written here.
    pub stdout: &'a mut dyn Write,
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// A command receives the raw parameter text, i.e. everything after the
/// first space of the command string, and is free to tokenize it.
pub trait ShellCommand {
    /// Name the user types. Unique within a registry and case-sensitive.
    fn name(&self) -> &str;

    /// One-line description shown by `help`.
    fn summary(&self) -> &str;

    /// Full usage text shown by `help <name>`.
    fn usage(&self) -> String {
        format!("{}: {}\n", self.name(), self.summary())
    }

    /// Executes the command.
    fn execute(&self, params: &str, ctx: &mut Context<'_>) -> Result<Flow, CommandError>;
}
