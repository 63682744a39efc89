use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::aggregator::DEFAULT_TOP_N;
use crate::error::Result;

pub const CONFIG_FILE: &str = ".histrankrc";

/// Look of the terminal bar charts. Color names are the ones `tui` knows
/// (`cyan`, `lightblue`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub bar_width: u16,
    pub bar_gap: u16,
    pub bar_color: String,
    pub value_color: String,
    pub label_color: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle {
            bar_width: 9,
            bar_gap: 1,
            bar_color: "lightblue".to_string(),
            value_color: "black".to_string(),
            label_color: "cyan".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub shell_type: String,
    pub history_file: Option<PathBuf>,
    pub top_n: usize,
    pub style: ChartStyle,
}

impl Default for Config {
    fn default() -> Self {
        Config::for_shell("bash")
    }
}

impl Config {
    pub fn for_shell(shell_type: &str) -> Self {
        Config {
            shell_type: shell_type.to_string(),
            history_file: None,
            top_n: DEFAULT_TOP_N,
            style: ChartStyle::default(),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_FILE))
    }

    /// `Ok(None)` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        let config_str = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(toml::from_str(&config_str)?))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string(self)?;
        fs::write(path, config_str)?;
        Ok(())
    }

    /// Loads `~/.histrankrc`, or detects the shell and writes a fresh one.
    pub fn load_or_init() -> Result<Self> {
        match Config::default_path() {
            Some(path) => Config::load_or_init_at(&path),
            None => {
                debug!("HOME is not set, using default config");
                Ok(Config::for_shell(&detect_shell()))
            }
        }
    }

    /// A config that cannot be saved is still used for this run.
    pub fn load_or_init_at(path: &Path) -> Result<Self> {
        if let Some(config) = Config::load_from(path)? {
            debug!(path = %path.display(), "loaded config");
            return Ok(config);
        }

        let config = Config::for_shell(&detect_shell());
        match config.save_to(path) {
            Ok(()) => info!(path = %path.display(), shell = %config.shell_type, "saved new config"),
            Err(e) => warn!(path = %path.display(), "could not save config: {}", e),
        }
        Ok(config)
    }
}

const KNOWN_SHELLS: [&str; 5] = ["bash", "zsh", "fish", "ksh", "tcsh"];

pub fn detect_available_shells() -> Vec<&'static str> {
    KNOWN_SHELLS
        .iter()
        .copied()
        .filter(|shell| {
            Command::new(shell)
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .is_ok()
        })
        .collect()
}

/// `$SHELL` when it names a known shell, else the first one installed,
/// else bash.
pub fn detect_shell() -> String {
    if let Some(shell) = env::var("SHELL").ok().as_deref().and_then(shell_from_path) {
        return shell.to_string();
    }
    detect_available_shells()
        .first()
        .copied()
        .unwrap_or("bash")
        .to_string()
}

fn shell_from_path(path: &str) -> Option<&'static str> {
    let name = Path::new(path).file_name()?.to_str()?;
    KNOWN_SHELLS.iter().copied().find(|&shell| shell == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = Config::for_shell("zsh");
        config.top_n = 7;
        config.style.bar_width = 5;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), Some(config));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_from(&dir.path().join("nope")).unwrap(), None);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "shell_type = \"fish\"\n[style]\nbar_gap = 3\n").unwrap();

        let config = Config::load_from(&path).unwrap().unwrap();
        assert_eq!(config.shell_type, "fish");
        assert_eq!(config.top_n, DEFAULT_TOP_N);
        assert_eq!(config.style.bar_gap, 3);
        assert_eq!(config.style.bar_width, ChartStyle::default().bar_width);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "top_n = \"many\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn first_run_writes_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let config = Config::load_or_init_at(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Some(config));
    }

    #[test]
    fn unwritable_config_location_still_yields_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-home").join(CONFIG_FILE);

        let config = Config::load_or_init_at(&path).unwrap();
        assert_eq!(config.top_n, DEFAULT_TOP_N);
        assert!(KNOWN_SHELLS.contains(&config.shell_type.as_str()));
        assert!(!path.exists());
    }

    #[test]
    fn shell_names_from_paths() {
        assert_eq!(shell_from_path("/usr/bin/zsh"), Some("zsh"));
        assert_eq!(shell_from_path("/bin/bash"), Some("bash"));
        assert_eq!(shell_from_path("/usr/bin/nu"), None);
    }
}
