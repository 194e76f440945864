//! Name-keyed table of command handlers, built once at startup.

use crate::command::ShellCommand;
use crate::error::RegistryError;
use std::collections::HashMap;

/// Registry of available commands.
///
/// Keeps registration order for enumeration and a name index for lookups.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Box<dyn ShellCommand>>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its own name.
    ///
    /// Registering the same name twice is a programming error and is reported
    /// as [`RegistryError::Duplicate`]; the registry is left unchanged.
    pub fn register(&mut self, command: Box<dyn ShellCommand>) -> Result<(), RegistryError> {
        let name = command.name().to_owned();
        if self.index.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        log::trace!("registered command {name}");
        self.index.insert(name, self.commands.len());
        self.commands.push(command);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&dyn ShellCommand> {
        self.index.get(name).map(|&i| self.commands[i].as_ref())
    }

    /// All commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn ShellCommand> {
        self.commands.iter().map(|command| command.as_ref())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
