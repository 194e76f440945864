//! Startup configuration: run mode, prompt and logging.

use crate::command::ExitCode;

/// Printed before every interactive read.
pub const PROMPT: &str = "$ ";

/// Status used when a batch run stops on a failed command.
pub const BATCH_FAILURE: ExitCode = 255;

/// How the shell consumes its input, decided once from the process arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Prompt and read standard input line by line.
    Interactive,
    /// Run the arguments, joined with single spaces, as one command line.
    Batch(String),
}

impl RunMode {
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .collect();
        if args.is_empty() {
            RunMode::Interactive
        } else {
            RunMode::Batch(args.join(" "))
        }
    }
}

/// Install the `env_logger` backend.
///
/// Standard error doubles as the channel for command failures, so only
/// warnings are shown unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}
