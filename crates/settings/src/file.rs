//! TOML config file support.
//!
//! Config location: `~/.config/terminon/config.toml`

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Custom keybinding: maps a command key (pressed after the prefix) to an action name.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct KeybindingEntry {
    /// Single key pressed after the prefix (e.g., "c", "T")
    pub keys: String,
    /// Action name (e.g., "new-tab", "close-tab", "quit")
    pub action: String,
}

/// User-facing config parsed from TOML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Profile id opened at startup (falls back to the platform default shell).
    pub startup_profile: Option<String>,
    /// Windows: shell preference ("powershell", "pwsh", or "cmd").
    pub windows_shell: Option<String>,
    /// Maximum number of scrollback lines per surface.
    pub scrollback_lines: usize,
    /// Front-end command prefix chord (e.g., "ctrl-a").
    pub prefix_key: String,
    /// Custom keybindings (override defaults).
    pub keybindings: Vec<KeybindingEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            startup_profile: None,
            windows_shell: None,
            scrollback_lines: crate::constants::scrollback::DEFAULT_LINES,
            prefix_key: "ctrl-a".to_string(),
            keybindings: Vec::new(),
        }
    }
}

impl Config {
    /// Scrollback clamped to the supported maximum.
    pub fn effective_scrollback(&self) -> usize {
        self.scrollback_lines
            .min(crate::constants::scrollback::MAX_LINES)
    }

    /// Executable for the Windows default shell.
    pub fn windows_shell_command(&self) -> &'static str {
        match self.windows_shell.as_deref() {
            Some("powershell") => "powershell.exe",
            Some("pwsh") => "pwsh.exe",
            Some("cmd") | None => "cmd.exe",
            Some(other) => {
                tracing::warn!("Unknown windows-shell '{}', using cmd.exe", other);
                "cmd.exe"
            }
        }
    }

    /// The control byte the prefix chord produces, falling back to ctrl-a.
    pub fn prefix_byte(&self) -> u8 {
        parse_ctrl_chord(&self.prefix_key).unwrap_or_else(|| {
            tracing::warn!("Invalid prefix-key '{}', using ctrl-a", self.prefix_key);
            0x01
        })
    }
}

/// Parse `ctrl-<letter>` into the control byte a terminal sends for it.
fn parse_ctrl_chord(chord: &str) -> Option<u8> {
    let key = chord.trim().to_ascii_lowercase();
    let letter = key.strip_prefix("ctrl-")?;
    let mut chars = letter.chars();
    let c = chars.next()?;
    if chars.next().is_some() || !c.is_ascii_lowercase() {
        return None;
    }
    Some((c as u8) & 0x1f)
}

/// Default config file content with comments (generated on first launch).
const DEFAULT_CONFIG: &str = r#"# Terminon Configuration

# Profile opened in the first tab ("default", "bash", "zsh", "cmd", "powershell",
# "wsl", or the id of a saved SSH profile)
# startup-profile = "default"

# Windows: shell used when a profile has no command: "powershell", "pwsh", or "cmd"
# windows-shell = "cmd"

# Maximum scrollback buffer size (lines)
scrollback-lines = 10000

# Command prefix: press it, then a command key
prefix-key = "ctrl-a"

# Custom keybindings (key pressed after the prefix)
# [[keybindings]]
# keys = "T"
# action = "new-tab"
#
# [[keybindings]]
# keys = "w"
# action = "close-tab"
"#;

/// Return the config file path.
pub fn config_path() -> PathBuf {
    terminon_paths::config_file()
}

/// Ensure the config file exists, creating a default if missing.
/// Returns the path to the config file.
pub fn ensure_config_file() -> Option<PathBuf> {
    let path = config_path();
    if !path.exists() {
        let parent = path.parent()?;
        std::fs::create_dir_all(parent).ok()?;
        std::fs::write(&path, DEFAULT_CONFIG).ok()?;
        tracing::info!("Created default config at {:?}", path);
    }
    Some(path)
}

/// Load and parse the config file. Returns default on any error.
pub fn load_config() -> Config {
    load_config_from(&config_path())
}

/// Load and parse a config file at an explicit path. Returns default on any error.
pub fn load_config_from(path: &Path) -> Config {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to read config: {}", e);
            }
            return Config::default();
        }
    };

    // Size guard
    if content.len() > crate::constants::settings::MAX_FILE_SIZE as usize {
        tracing::warn!(
            "Config file too large ({} bytes), using defaults",
            content.len()
        );
        return Config::default();
    }

    match toml::from_str(&content) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("Failed to parse config.toml: {}", e);
            Config::default()
        }
    }
}
