use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, Write};

/// Source of interactive input lines.
///
/// Implementations show `prompt` before waiting for a line and return
/// `Ok(None)` once the input is exhausted.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Line editor backed by `rustyline`, for terminals.
pub struct Editor {
    inner: DefaultEditor,
}

impl Editor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: DefaultEditor::new()?,
        })
    }
}

impl LineSource for Editor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let line = edited_line(self.inner.readline(prompt))?;
        if let Some(entry) = line.as_deref().filter(|l| !l.trim().is_empty()) {
            self.inner.add_history_entry(entry)?;
        }
        Ok(line)
    }
}

fn edited_line(read: Result<String, ReadlineError>) -> Result<Option<String>> {
    match read {
        Ok(line) => Ok(Some(line)),
        // Ctrl-C drops the line being edited, the session goes on
        Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
        Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Plain buffered reader that writes the prompt to a separate stream.
///
/// Used when standard input is not a terminal, and by tests with in-memory buffers.
pub struct Prompted<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> Prompted<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }

    /// Give back the prompt stream, e.g. to inspect what was written to it.
    pub fn into_prompt_out(self) -> W {
        self.prompt_out
    }
}

impl<R: BufRead, W: Write> LineSource for Prompted<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.prompt_out, "{prompt}")?;
        self.prompt_out.flush()?;

        let mut bytes = Vec::new();
        if self.reader.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }
        let mut line = String::from_utf8_lossy(&bytes).into_owned();
        let len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(len);
        Ok(Some(line))
    }
}
