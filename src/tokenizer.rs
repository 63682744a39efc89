//! Splits raw history text into commands, and commands into keyword tokens.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HISTORY_NUMBER: Regex = Regex::new(r"^\s*\d+\s+").unwrap();
    static ref TIMESTAMP_MARKER: Regex = Regex::new(r"^#\d+").unwrap();
    static ref ZSH_EXTENDED: Regex = Regex::new(r"^: *\d+:\d+;(.*)$").unwrap();
    // A run of non-space, non-comma characters, where a double-quoted span
    // (with backslash escapes) may contain anything and binds to its neighbours.
    static ref TOKEN: Regex = Regex::new(r#"(?:[^\s,"]|"(?:\\.|[^"])*")+"#).unwrap();
}

/// Commands and tokens extracted from one history text, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    pub commands: Vec<String>,
    pub tokens: Vec<String>,
}

impl Tokenized {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Tokens of the extracted commands fed back in as plain history text.
    pub fn retokenize(&self) -> Vec<String> {
        process_history(&self.commands.join("\n")).tokens
    }
}

/// Never fails: anything that is not a history number or a timestamp
/// marker is taken literally as a command.
pub fn process_history(history_text: &str) -> Tokenized {
    if history_text.trim().is_empty() {
        return Tokenized::default();
    }

    let commands: Vec<String> = history_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(extract_command)
        .collect();
    let tokens = tokenize_commands(&commands);

    Tokenized { commands, tokens }
}

fn extract_command(line: &str) -> Option<String> {
    if let Some(prefix) = HISTORY_NUMBER.find(line) {
        return strip_zsh_header(line[prefix.end()..].trim());
    }
    if TIMESTAMP_MARKER.is_match(line) {
        return None;
    }
    strip_zsh_header(line)
}

/// `: <ts>:<elapsed>;cmd` yields `cmd`; an empty command yields nothing.
fn strip_zsh_header(line: &str) -> Option<String> {
    match ZSH_EXTENDED.captures(line) {
        Some(caps) => {
            let command = caps[1].trim();
            if command.is_empty() { None } else { Some(command.to_string()) }
        }
        None => Some(line.to_string()),
    }
}

pub fn tokenize_commands(commands: &[String]) -> Vec<String> {
    commands.iter().flat_map(|cmd| tokenize(cmd)).collect()
}

/// Keyword tokens of a single command: flags dropped, one layer of quotes
/// stripped, lowercased, numbers dropped.
pub fn tokenize(command: &str) -> Vec<String> {
    TOKEN
        .find_iter(command)
        .map(|m| m.as_str())
        .filter(|raw| !raw.starts_with('-'))
        .map(|raw| strip_quote_layer(raw).to_lowercase())
        .filter(|token| !token.is_empty() && !token.chars().all(|c| c.is_ascii_digit()))
        .collect()
}

fn strip_quote_layer(token: &str) -> &str {
    let is_quote = |c: char| c == '"' || c == '\'';
    let token = token.strip_prefix(is_quote).unwrap_or(token);
    token.strip_suffix(is_quote).unwrap_or(token)
}
