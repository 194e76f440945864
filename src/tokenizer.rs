//! Splitting of raw input into commands, command names and argument tokens.
//!
//! All functions here are total: any string is valid input, and nothing is
//! kept between calls.
//!
//! ```
//! use minishell::tokenizer;
//!
//! let commands = tokenizer::split_commands("mkdir 'my dir'; cd \"my dir\"");
//! assert_eq!(commands, ["mkdir 'my dir'", "cd \"my dir\""]);
//!
//! let params = tokenizer::extract_parameters(&commands[0]);
//! assert_eq!(tokenizer::tokenize_parameters(params), ["my dir"]);
//! ```

use regex::Regex;
use std::sync::LazyLock;

/// Separator between commands on one input line.
pub const COMMAND_SEPARATOR: char = ';';

/// A bare word, or a double- or single-quoted span without the same quote inside.
///
/// The unquoted alternative excludes both quote characters, so a quote that
/// never gets closed matches nothing and is skipped. Only ASCII whitespace
/// separates words; a no-break space is part of a word.
static PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[^ \t\n\x0B\x0C\r"']+|"[^"]*"|'[^']*'"#)
        .expect("parameter pattern is valid")
});

/// Split `text` on every `;` and trim each piece.
///
/// Trimming drops ASCII control characters and spaces at both ends, nothing
/// else. Empty pieces are kept; the dispatcher treats an empty command as a no-op.
pub fn split_commands(text: &str) -> Vec<String> {
    text.split(COMMAND_SEPARATOR)
        .map(|piece| piece.trim_matches(|c: char| c <= ' ').to_owned())
        .collect()
}

/// Everything before the first space, or the whole string.
pub fn extract_command_name(command: &str) -> &str {
    match command.split_once(' ') {
        Some((name, _)) => name,
        None => command,
    }
}

/// Everything after the first space, or `""`.
pub fn extract_parameters(command: &str) -> &str {
    match command.split_once(' ') {
        Some((_, params)) => params,
        None => "",
    }
}

/// Break parameter text into argument tokens, left to right.
///
/// Quoted spans lose their outer quotes and keep everything inside,
/// including the other kind of quote. Whitespace only separates.
pub fn tokenize_parameters(params: &str) -> Vec<String> {
    PARAMETER
        .find_iter(params)
        .map(|m| strip_quotes(m.as_str()).to_owned())
        .collect()
}

/// Number of tokens [`tokenize_parameters`] would produce.
pub fn count_parameters(params: &str) -> usize {
    PARAMETER.find_iter(params).count()
}

fn strip_quotes(token: &str) -> &str {
    for quote in ['"', '\''] {
        if token.len() >= 2 && token.starts_with(quote) && token.ends_with(quote) {
            return &token[1..token.len() - 1];
        }
    }
    token
}
