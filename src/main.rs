use minishell::Interpreter;
use minishell::config::{self, RunMode};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    config::init_logging();

    let mode = RunMode::from_args(std::env::args().skip(1));
    let mut shell = Interpreter::with_builtins()?;
    let code = shell.run(mode)?;

    Ok(ExitCode::from(u8::try_from(code).unwrap_or(u8::MAX)))
}
