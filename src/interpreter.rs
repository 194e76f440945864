use crate::builtin;
use crate::command::ExitCode;
use crate::config::{BATCH_FAILURE, PROMPT, RunMode};
use crate::dispatch::{Dispatcher, Outcome};
use crate::env::Environment;
use crate::error::RegistryError;
use crate::io_adapters::{Editor, LineSource, Prompted};
use crate::registry::CommandRegistry;
use crate::tokenizer;
use anyhow::Result;
use std::io::{self, IsTerminal, Write};

/// The shell loop.
///
/// Feeds command strings to a [`Dispatcher`] and decides, per run mode,
/// whether a failed command ends the run.
///
/// Example
/// ```
/// use minishell::Interpreter;
/// let mut sh = Interpreter::with_builtins().unwrap();
/// let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
/// let code = sh.run_batch("pwd; nosuch; pwd", &mut out, &mut err).unwrap();
/// assert_ne!(code, 0);
/// assert_eq!(String::from_utf8(err).unwrap(), "nosuch: command not found. Type help to get help\n");
/// ```
pub struct Interpreter {
    dispatcher: Dispatcher,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of commands.
    pub fn new(registry: CommandRegistry, env: Environment) -> Self {
        Self {
            dispatcher: Dispatcher::new(registry, env),
        }
    }

    /// Interpreter with every built-in command, working in the process's current directory.
    pub fn with_builtins() -> Result<Self, RegistryError> {
        Ok(Self::new(builtin::default_registry()?, Environment::new()))
    }

    pub fn env(&self) -> &Environment {
        self.dispatcher.env()
    }

    /// Run in `mode` against the process's standard streams.
    pub fn run(&mut self, mode: RunMode) -> Result<ExitCode> {
        let mut stdout = io::stdout();
        let mut stderr = io::stderr();
        match mode {
            RunMode::Batch(line) => {
                log::info!("batch mode: {line}");
                self.run_batch(&line, &mut stdout, &mut stderr)
            }
            RunMode::Interactive if io::stdin().is_terminal() => {
                log::info!("interactive mode, line editor");
                let mut editor = Editor::new()?;
                self.run_interactive(&mut editor, &mut stdout, &mut stderr)
            }
            RunMode::Interactive => {
                log::info!("interactive mode, plain input");
                let mut source = Prompted::new(io::stdin().lock(), io::stdout());
                self.run_interactive(&mut source, &mut stdout, &mut stderr)
            }
        }
    }

    /// Run one command line and stop at the first failed command.
    ///
    /// Returns 0 when every command succeeded, [`BATCH_FAILURE`] after a
    /// failure, or the status requested by an exit command.
    pub fn run_batch(
        &mut self,
        line: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<ExitCode> {
        for command in tokenizer::split_commands(line) {
            match self.dispatcher.dispatch(&command, stdout)? {
                Outcome::Ok => {}
                Outcome::Exit(code) => return Ok(code),
                Outcome::Failed(failure) => {
                    writeln!(stderr, "{failure}")?;
                    log::debug!("batch stopped at '{command}'");
                    return Ok(BATCH_FAILURE);
                }
            }
        }
        stdout.flush()?;
        Ok(0)
    }

    /// Read lines from `input` until it runs dry.
    ///
    /// Failures are reported and the loop moves on to the next command.
    /// Returns 0 at end of input, or the status requested by an exit command.
    pub fn run_interactive(
        &mut self,
        input: &mut dyn LineSource,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<ExitCode> {
        while let Some(line) = input.read_line(PROMPT)? {
            for command in tokenizer::split_commands(&line) {
                match self.dispatcher.dispatch(&command, stdout)? {
                    Outcome::Ok => {}
                    Outcome::Exit(code) => return Ok(code),
                    Outcome::Failed(failure) => writeln!(stderr, "{failure}")?,
                }
            }
            stdout.flush()?;
        }
        Ok(0)
    }
}
