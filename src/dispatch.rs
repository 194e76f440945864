//! Resolution of a single command string to one handler invocation.

use crate::command::{Context, ExitCode, Flow};
use crate::env::Environment;
use crate::error::CommandError;
use crate::registry::CommandRegistry;
use crate::tokenizer;
use std::fmt::{self, Display, Formatter};
use std::io::Write;

/// Message reported for names missing from the registry.
pub const NOT_FOUND_MESSAGE: &str = "command not found. Type help to get help";

/// A failure that is reported to the user, as opposed to a defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub command: String,
    pub message: String,
}

impl Display for Failure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.command, self.message)
    }
}

/// Result of dispatching one command string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Failed(Failure),
    /// The command asked the shell to stop.
    Exit(ExitCode),
}

impl Outcome {
    /// A failure with `message` folded onto one line.
    fn failed(command: &str, message: &str) -> Self {
        let message = message
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Outcome::Failed(Failure {
            command: command.to_owned(),
            message,
        })
    }
}

/// Owns the registry and the shared environment, and runs commands against them.
pub struct Dispatcher {
    registry: CommandRegistry,
    env: Environment,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry, env: Environment) -> Self {
        Self { registry, env }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Run one command string.
    ///
    /// An empty command name is a no-op. Unknown names, validation failures
    /// and I/O failures all come back as [`Outcome::Failed`]. Only a
    /// [`CommandError::Defect`] is returned as `Err`.
    pub fn dispatch(&mut self, command: &str, stdout: &mut dyn Write) -> anyhow::Result<Outcome> {
        let name = tokenizer::extract_command_name(command);
        if name.is_empty() {
            return Ok(Outcome::Ok);
        }
        let params = tokenizer::extract_parameters(command);

        let Some(handler) = self.registry.lookup(name) else {
            log::debug!("{name}: not registered");
            return Ok(Outcome::failed(name, NOT_FOUND_MESSAGE));
        };

        log::debug!(
            "dispatching {name} with {} parameter(s)",
            tokenizer::count_parameters(params)
        );
        let mut ctx = Context {
            env: &mut self.env,
            registry: &self.registry,
            stdout,
        };
        match handler.execute(params, &mut ctx) {
            Ok(Flow::Continue) => Ok(Outcome::Ok),
            Ok(Flow::Exit(code)) => Ok(Outcome::Exit(code)),
            Err(CommandError::Defect(err)) => {
                Err(err.context(format!("{name}: command failed unexpectedly")))
            }
            Err(err) => Ok(Outcome::failed(name, &err.to_string())),
        }
    }
}
