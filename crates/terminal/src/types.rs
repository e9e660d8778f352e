//! Terminal data types.
//!
//! Geometry, session identity, and the per-frame render snapshot. Kept free
//! of behavior so they can be constructed directly in tests.

use alacritty_terminal::grid::Dimensions;
use settings::constants::terminal::{
    CELL_HEIGHT, CELL_WIDTH, DEFAULT_COLS, DEFAULT_ROWS, MIN_COLS, MIN_ROWS, PADDING,
};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use theme::Rgb;

/// Terminal dimensions in rows and columns.
///
/// Implements `Dimensions` trait for alacritty compatibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TermSize {
    pub cols: u16,
    pub rows: u16,
}

impl Default for TermSize {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
        }
    }
}

impl TermSize {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// The row/column geometry that fits in `area`, never below the minimums.
    pub fn fit(area: SurfaceArea) -> Self {
        // Tolerate float error so `from_cells` round-trips exactly.
        let cells = |pixels: f32, cell: f32| ((pixels - 2.0 * PADDING) / cell + 1e-3).floor();
        let cols = cells(area.width, CELL_WIDTH).clamp(MIN_COLS as f32, u16::MAX as f32) as u16;
        let rows = cells(area.height, CELL_HEIGHT).clamp(MIN_ROWS as f32, u16::MAX as f32) as u16;
        Self { cols, rows }
    }
}

impl Dimensions for TermSize {
    fn total_lines(&self) -> usize {
        self.rows as usize
    }

    fn screen_lines(&self) -> usize {
        self.rows as usize
    }

    fn columns(&self) -> usize {
        self.cols as usize
    }
}

/// Pixel dimensions of the region a surface is laid out in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceArea {
    pub width: f32,
    pub height: f32,
}

impl SurfaceArea {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The area a character-cell front-end offers for `cols` x `rows` cells.
    pub fn from_cells(cols: u16, rows: u16) -> Self {
        Self {
            width: cols as f32 * CELL_WIDTH + 2.0 * PADDING,
            height: rows as f32 * CELL_HEIGHT + 2.0 * PADDING,
        }
    }
}

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier for a tab and the session behind it.
///
/// Allocated from one process-wide counter, so ids never repeat within a run.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(String);

impl SessionId {
    /// Allocate the next id, e.g. `term-7`.
    pub fn allocate(prefix: &str) -> Self {
        let n = NEXT_SESSION.fetch_add(1, Ordering::Relaxed);
        Self(format!("{prefix}-{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text attributes a front-end needs to reproduce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// A single cell to render, with colors already resolved against the theme.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderCell {
    pub c: char,
    pub fg: Rgb,
    pub bg: Rgb,
    pub style: CellStyle,
}

/// Pre-computed render data for a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// One entry per screen line. Wide-character spacers are omitted.
    pub lines: Vec<Vec<RenderCell>>,
    /// Cursor position as (row, col), if visible.
    pub cursor: Option<(usize, usize)>,
    pub background: Rgb,
    pub foreground: Rgb,
}

impl Frame {
    /// The text of one line with trailing blanks trimmed.
    pub fn line_text(&self, row: usize) -> String {
        self.lines
            .get(row)
            .map(|cells| cells.iter().map(|cell| cell.c).collect::<String>())
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default()
    }
}
