//! Getting raw history text out of files and shells.

use std::env;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};
use wait_timeout::ChildExt;

use crate::config::Config;
use crate::error::{HistoryError, Result};

pub const HISTORY_TIMEOUT: Duration = Duration::from_secs(10);

/// Expands a leading `~` to the home directory.
pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// Reads a history file, replacing invalid UTF-8 rather than failing.
/// Fish history is reduced to its command lines.
pub fn read_history_file(path: &Path) -> Result<String> {
    let path = expand_path(path);
    let bytes = fs::read(&path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "read history file");
    let text = String::from_utf8_lossy(&bytes).into_owned();
    if is_fish_history(&text) {
        debug!(path = %path.display(), "fish history format");
        return Ok(fish_commands(&text));
    }
    Ok(text)
}

pub fn history_file_for(shell_type: &str, home: &Path) -> PathBuf {
    match shell_type {
        "zsh" => home.join(".zsh_history"),
        "fish" => home.join(".local/share/fish/fish_history"),
        _ => home.join(".bash_history"),
    }
}

fn is_fish_history(text: &str) -> bool {
    text.lines()
        .find(|line| !line.trim().is_empty())
        .map_or(false, |line| line.starts_with("- cmd: "))
}

/// Keeps only the command lines of fish's `- cmd: ...` history entries.
pub fn fish_commands(text: &str) -> String {
    text.lines()
        .filter_map(|line| line.strip_prefix("- cmd: "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The configured history file, else the shell's own file, else the
/// shell's `history` builtin.
pub fn load_shell_history(config: &Config) -> Result<String> {
    if let Some(path) = &config.history_file {
        return read_history_file(path);
    }

    if let Some(home) = env::var_os("HOME") {
        let path = history_file_for(&config.shell_type, Path::new(&home));
        match read_history_file(&path) {
            Ok(text) if !text.trim().is_empty() => {
                return Ok(text);
            }
            Ok(_) => debug!(path = %path.display(), "history file is empty"),
            Err(e) => warn!(path = %path.display(), "could not read history file: {}", e),
        }
    }

    run_history_command(&config.shell_type, HISTORY_TIMEOUT)
}

/// Runs `<shell> -i -c "history -r; history"`, killing it after `timeout`.
pub fn run_history_command(shell: &str, timeout: Duration) -> Result<String> {
    let mut child = Command::new(shell)
        .args(["-i", "-c", "history -r; history"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| HistoryError::Unavailable("no stdout from shell".to_string()))?;
    let reader = thread::spawn(move || {
        let mut buf = Vec::new();
        stdout.read_to_end(&mut buf).map(|_| buf)
    });

    let status = match child.wait_timeout(timeout)? {
        Some(status) => status,
        None => {
            child.kill()?;
            child.wait()?;
            return Err(HistoryError::Timeout(timeout));
        }
    };

    let output = reader
        .join()
        .map_err(|_| HistoryError::Unavailable("history reader panicked".to_string()))??;

    if !status.success() {
        return Err(HistoryError::Unavailable(format!("{} exited with {}", shell, status)));
    }
    Ok(String::from_utf8_lossy(&output).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn lossy_file_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"ls\ncat caf\xe9\n").unwrap();

        let text = read_history_file(file.path()).unwrap();
        assert!(text.starts_with("ls\ncat caf"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_history_file(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, HistoryError::Io(_)));
    }

    #[test]
    fn configured_file_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "git status").unwrap();

        let mut config = Config::for_shell("bash");
        config.history_file = Some(file.path().to_path_buf());
        assert_eq!(load_shell_history(&config).unwrap(), "git status\n");
    }

    #[test]
    fn fish_entries() {
        let text = "- cmd: ls -la\n  when: 1700000000\n- cmd: git push\n  when: 1700000001\n  paths:\n    - foo\n";
        assert_eq!(fish_commands(text), "ls -la\ngit push");
    }

    #[test]
    fn fish_file_read_from_any_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\n- cmd: cargo test\n  when: 1700000000\n- cmd: ls\n  when: 1700000001\n").unwrap();

        assert_eq!(read_history_file(file.path()).unwrap(), "cargo test\nls");

        let mut config = Config::for_shell("bash");
        config.history_file = Some(file.path().to_path_buf());
        assert_eq!(load_shell_history(&config).unwrap(), "cargo test\nls");
    }

    #[test]
    fn plain_text_mentioning_cmd_is_untouched() {
        assert!(!is_fish_history("echo '- cmd: x'\n- cmd: y\n"));
        assert!(is_fish_history("\n\n- cmd: y\n"));
    }

    #[test]
    fn tilde_paths_expand_to_home() {
        assert_eq!(expand_path(Path::new("/var/log/x")), PathBuf::from("/var/log/x"));
        if let Some(home) = env::var_os("HOME").filter(|h| !h.is_empty()) {
            assert_eq!(expand_path(Path::new("~/.bash_history")), Path::new(&home).join(".bash_history"));
        }
    }

    #[test]
    fn history_paths() {
        let home = Path::new("/home/u");
        assert_eq!(history_file_for("zsh", home), PathBuf::from("/home/u/.zsh_history"));
        assert_eq!(history_file_for("ksh", home), PathBuf::from("/home/u/.bash_history"));
    }

    #[test]
    fn missing_shell_fails() {
        assert!(run_history_command("no-such-shell-here", Duration::from_secs(1)).is_err());
    }
}
