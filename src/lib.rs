//! A minimal command shell.
//!
//! Input lines are split on `;` into command strings. Each command string is
//! split into a command name and its raw parameter text, and dispatched to the
//! handler registered under that name. Interactive sessions report failures
//! and carry on; batch runs (process arguments) stop at the first failure.
//!
//! The main entry point is [`Interpreter`]. Custom commands implement
//! [`command::ShellCommand`] and go into a [`registry::CommandRegistry`];
//! [`default_registry`] provides the built-in file commands.

mod builtin;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod env;
pub mod error;
pub mod io_adapters;
mod interpreter;
pub mod registry;
pub mod tokenizer;

pub use builtin::default_registry;

/// Just a convenient re-export of the command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;
