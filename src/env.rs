use std::env as stdenv;
use std::path::{Path, PathBuf};

/// Process-wide state shared by every command invocation.
///
/// The environment contains:
/// - `current_dir`: the directory relative paths are resolved against.
/// - `home`: where `cd` without arguments goes, if known.
///
/// The shell never calls `std::env::set_current_dir`; commands read and
/// update `current_dir` here instead, one at a time.
#[derive(Debug, Clone)]
pub struct Environment {
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// The user's home directory, captured from `HOME` at startup.
    pub home: Option<PathBuf>,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            current_dir,
            home: stdenv::var_os("HOME").map(PathBuf::from),
        }
    }

    /// An environment rooted at `dir`, without a home directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            current_dir: dir.into(),
            home: None,
        }
    }

    /// Resolve `path` against the current directory. Absolute paths are returned as-is.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.current_dir.join(path)
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
