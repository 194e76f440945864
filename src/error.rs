//! Error types shared by the registry, the dispatcher and the built-in commands.

use std::io;
use thiserror::Error;

/// Failure produced by a command handler.
///
/// Only [`CommandError::InvalidArguments`] and [`CommandError::Io`] are
/// reported to the user. A [`CommandError::Defect`] means the handler broke
/// its contract and is propagated as a fatal error by the dispatcher.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The handler rejected the shape of its parameters.
    #[error("{0}")]
    InvalidArguments(String),

    /// An underlying filesystem or stream operation failed.
    #[error("{context}: {source}")]
    Io {
        /// What the handler was trying to do.
        context: String,
        #[source]
        source: io::Error,
    },

    /// Anything else.
    #[error(transparent)]
    Defect(#[from] anyhow::Error),
}

impl CommandError {
    pub fn invalid(message: impl Into<String>) -> Self {
        CommandError::InvalidArguments(message.into())
    }
}

/// Error raised while building a [`CommandRegistry`](crate::registry::CommandRegistry).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command '{0}' is already registered")]
    Duplicate(String),
}

/// Attach a human readable context to an I/O error, turning it into
/// [`CommandError::Io`].
///
/// Same idea as `anyhow::Context`, but keeps the error in the reported category.
pub trait IoContext<T> {
    fn io_context<C, F>(self, f: F) -> Result<T, CommandError>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T> IoContext<T> for io::Result<T> {
    fn io_context<C, F>(self, f: F) -> Result<T, CommandError>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|source| CommandError::Io {
            context: f().into(),
            source,
        })
    }
}
