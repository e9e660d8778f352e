//! Centralized configuration constants for Terminon.
//!
//! Compile-time constants organized by component.

/// Terminal surface configuration.
pub mod terminal {
    /// Rows a PTY is opened with before the first fit.
    pub const DEFAULT_ROWS: u16 = 24;
    /// Columns a PTY is opened with before the first fit.
    pub const DEFAULT_COLS: u16 = 80;

    /// Width of one cell in surface pixels.
    pub const CELL_WIDTH: f32 = 8.4;
    /// Height of one cell in surface pixels.
    pub const CELL_HEIGHT: f32 = 17.0;

    /// Padding around terminal content.
    pub const PADDING: f32 = 2.0;

    /// Smallest geometry a fit may produce.
    pub const MIN_ROWS: u16 = 1;
    pub const MIN_COLS: u16 = 2;

    /// `TERM` exported to every spawned session.
    pub const TERM_ENV: &str = "xterm-256color";

    /// Read buffer for PTY output.
    pub const READ_BUFFER_SIZE: usize = 4096;
}

/// Tab strip configuration.
pub mod tab_bar {
    /// Rows reserved for the tab strip above the active surface.
    pub const HEIGHT_ROWS: u16 = 1;
    /// Titles longer than this are truncated in the strip.
    pub const MAX_TITLE_CHARS: usize = 24;
}

/// Remote (SSH) profile configuration.
pub mod ssh {
    /// External client binary the remote invocation targets.
    pub const CLIENT: &str = "ssh";
    /// Port that needs no `-p` flag.
    pub const DEFAULT_PORT: u16 = 22;
}

/// Scrollback buffer configuration.
pub mod scrollback {
    /// Default scrollback buffer size in lines.
    pub const DEFAULT_LINES: usize = 10_000;
    /// Maximum allowed scrollback buffer size in lines.
    pub const MAX_LINES: usize = 100_000;
}

/// Persisted store keys.
pub mod store {
    /// Ordered sequence of remote profile records.
    pub const SSH_PROFILES_KEY: &str = "ssh_profiles";
    /// Selected theme identifier.
    pub const THEME_KEY: &str = "theme";
}

/// Settings file validation limits.
pub mod settings {
    /// Maximum settings file size in bytes (64 KB).
    /// Settings files should be tiny; anything larger is suspicious.
    pub const MAX_FILE_SIZE: u64 = 64 * 1024;

    /// Maximum length for string fields (profile names, hosts).
    pub const MAX_STRING_LENGTH: usize = 256;
}
