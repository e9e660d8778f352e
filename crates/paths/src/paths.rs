//! Where Terminon keeps its files.
//!
//! - `config.toml` in the config dir: user settings, read once at startup.
//! - `store.json` in the data dir: saved SSH profiles and the selected theme.
//! - `terminon.log` in the logs dir: all tracing output, since the TTY is
//!   taken over by the front-end.
//!
//! Directories resolve lazily and are cached for the process lifetime. The
//! `set_*` overrides only take effect before the first lookup.

use std::io;
use std::path::PathBuf;
use std::sync::OnceLock;

static CONFIG_DIR: OnceLock<PathBuf> = OnceLock::new();
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();
static LOGS_DIR: OnceLock<PathBuf> = OnceLock::new();

const APP_DIR: &str = "terminon";

fn under(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
}

/// ~/.config/terminon (or platform equivalent)
pub fn config_dir() -> &'static PathBuf {
    CONFIG_DIR.get_or_init(|| under(dirs::config_dir()))
}

/// ~/.local/share/terminon (or platform equivalent)
pub fn data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(|| under(dirs::data_dir()))
}

/// ~/Library/Logs/terminon on macOS, data_dir()/logs elsewhere
pub fn logs_dir() -> &'static PathBuf {
    LOGS_DIR.get_or_init(|| {
        if cfg!(target_os = "macos") {
            under(dirs::home_dir().map(|home| home.join("Library").join("Logs")))
        } else {
            data_dir().join("logs")
        }
    })
}

pub fn set_config_dir(path: PathBuf) {
    let _ = CONFIG_DIR.set(path);
}

pub fn set_data_dir(path: PathBuf) {
    let _ = DATA_DIR.set(path);
}

pub fn set_logs_dir(path: PathBuf) {
    let _ = LOGS_DIR.set(path);
}

/// Every directory Terminon writes into.
pub fn app_dirs() -> [&'static PathBuf; 3] {
    [config_dir(), data_dir(), logs_dir()]
}

/// Create any missing app directory. The error names the directory.
pub fn ensure_app_dirs() -> io::Result<()> {
    for dir in app_dirs() {
        std::fs::create_dir_all(dir).map_err(|e| {
            io::Error::new(e.kind(), format!("failed to create {}: {}", dir.display(), e))
        })?;
    }
    Ok(())
}

pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn store_file() -> PathBuf {
    data_dir().join("store.json")
}

pub fn log_file() -> PathBuf {
    logs_dir().join("terminon.log")
}
