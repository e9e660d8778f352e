//! Rendering surfaces.
//!
//! A surface interprets a session's output stream and exposes what to draw.
//! [`TerminalSurface`] does this with alacritty_terminal; the palette is
//! applied when a frame is taken, so a theme change never touches the
//! emulator state.

use crate::colors::{bright_color, dim, indexed_color, resolve_color, to_term_rgb};
use crate::types::{CellStyle, Frame, RenderCell, SurfaceArea, TermSize};
use alacritty_terminal::event::{Event, EventListener, WindowSize};
use alacritty_terminal::grid::Dimensions;
use alacritty_terminal::index::{Column, Line};
use alacritty_terminal::term::cell::Flags;
use alacritty_terminal::term::{Config, Term, TermMode};
use alacritty_terminal::vte::ansi::{NamedColor, Processor};
use parking_lot::Mutex;
use settings::constants::terminal::{CELL_HEIGHT, CELL_WIDTH};
use std::sync::Arc;
use theme::Theme;

/// What a session bridge needs from the thing that displays a session.
pub trait RenderSurface {
    /// Feed process output.
    fn write(&mut self, data: &str);

    /// Recompute the row/column geometry for `area` and return it.
    fn fit(&mut self, area: SurfaceArea) -> TermSize;

    fn size(&self) -> TermSize;

    /// Switch palettes in place.
    fn apply_theme(&mut self, theme: &'static Theme);

    fn theme(&self) -> &'static Theme;

    /// Title set by the running program, if any.
    fn title(&self) -> Option<String>;

    /// Responses to terminal queries that must be written back to the session.
    fn take_replies(&mut self) -> Vec<String>;

    /// The current screen, or `None` once disposed.
    fn snapshot(&self) -> Option<Frame>;

    /// Release emulator resources. Idempotent.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;

    /// Whether cursor keys should be sent in application mode (DECCKM).
    fn application_cursor(&self) -> bool {
        false
    }
}

/// Builds a fresh surface for a new terminal tab.
pub type SurfaceFactory = Box<dyn FnMut(&'static Theme) -> Box<dyn RenderSurface>>;

/// Event listener for alacritty terminal events.
///
/// Query responses are queued rather than written so they go through the
/// same guarded write path as keystrokes.
#[derive(Clone)]
struct SurfaceListener {
    title: Arc<Mutex<Option<String>>>,
    replies: Arc<Mutex<Vec<String>>>,
    theme: Arc<Mutex<&'static Theme>>,
    size: Arc<Mutex<TermSize>>,
}

impl SurfaceListener {
    fn new(theme: &'static Theme, size: TermSize) -> Self {
        Self {
            title: Arc::new(Mutex::new(None)),
            replies: Arc::new(Mutex::new(Vec::new())),
            theme: Arc::new(Mutex::new(theme)),
            size: Arc::new(Mutex::new(size)),
        }
    }

    fn queried_color(&self, index: usize) -> theme::Rgb {
        let theme = *self.theme.lock();
        match u8::try_from(index) {
            Ok(idx) => indexed_color(idx, theme),
            Err(_) if index == NamedColor::Background as usize => theme.background,
            Err(_) if index == NamedColor::Cursor as usize => theme.cursor,
            Err(_) => theme.foreground,
        }
    }
}

impl EventListener for SurfaceListener {
    fn send_event(&self, event: Event) {
        match event {
            Event::Title(title) => *self.title.lock() = Some(title),
            Event::ResetTitle => *self.title.lock() = None,
            Event::PtyWrite(text) => self.replies.lock().push(text),
            Event::ColorRequest(index, formatter) => {
                let response = formatter(to_term_rgb(self.queried_color(index)));
                self.replies.lock().push(response);
            }
            Event::TextAreaSizeRequest(formatter) => {
                let size = *self.size.lock();
                let response = formatter(WindowSize {
                    num_lines: size.rows,
                    num_cols: size.cols,
                    cell_width: CELL_WIDTH as u16,
                    cell_height: CELL_HEIGHT as u16,
                });
                self.replies.lock().push(response);
            }
            _ => {}
        }
    }
}

/// alacritty_terminal-backed surface.
pub struct TerminalSurface {
    term: Option<Term<SurfaceListener>>,
    processor: Processor,
    listener: SurfaceListener,
    size: TermSize,
}

impl TerminalSurface {
    pub fn new(size: TermSize, theme: &'static Theme, scrollback_lines: usize) -> Self {
        let listener = SurfaceListener::new(theme, size);
        let config = Config {
            scrolling_history: scrollback_lines,
            ..Config::default()
        };
        let term = Term::new(config, &size, listener.clone());
        Self {
            term: Some(term),
            processor: Processor::new(),
            listener,
            size,
        }
    }

    /// A factory producing surfaces with the given scrollback.
    pub fn factory(scrollback_lines: usize) -> SurfaceFactory {
        Box::new(move |theme| {
            Box::new(TerminalSurface::new(
                TermSize::default(),
                theme,
                scrollback_lines,
            )) as Box<dyn RenderSurface>
        })
    }
}

impl RenderSurface for TerminalSurface {
    fn write(&mut self, data: &str) {
        let Some(term) = self.term.as_mut() else {
            util::debug_panic!("write of {} bytes to a disposed surface", data.len());
            return;
        };
        self.processor.advance(term, data.as_bytes());
    }

    fn fit(&mut self, area: SurfaceArea) -> TermSize {
        let size = TermSize::fit(area);
        if size != self.size {
            self.size = size;
            *self.listener.size.lock() = size;
            if let Some(term) = self.term.as_mut() {
                term.resize(size);
            }
        }
        size
    }

    fn size(&self) -> TermSize {
        self.size
    }

    fn apply_theme(&mut self, theme: &'static Theme) {
        *self.listener.theme.lock() = theme;
    }

    fn theme(&self) -> &'static Theme {
        *self.listener.theme.lock()
    }

    fn title(&self) -> Option<String> {
        self.listener.title.lock().clone()
    }

    fn take_replies(&mut self) -> Vec<String> {
        std::mem::take(&mut *self.listener.replies.lock())
    }

    fn snapshot(&self) -> Option<Frame> {
        let term = self.term.as_ref()?;
        let theme = self.theme();
        let colors = term.colors();
        let grid = term.grid();

        let mut lines = Vec::with_capacity(grid.screen_lines());
        for row in 0..grid.screen_lines() {
            let grid_row = &grid[Line(row as i32)];
            let mut cells = Vec::with_capacity(grid.columns());
            for col in 0..grid.columns() {
                let cell = &grid_row[Column(col)];
                if cell.flags.contains(Flags::WIDE_CHAR_SPACER) {
                    continue;
                }
                let mut fg = if cell.flags.contains(Flags::BOLD) {
                    bright_color(cell.fg, colors, theme)
                } else {
                    resolve_color(cell.fg, colors, theme)
                };
                if cell.flags.contains(Flags::DIM) {
                    fg = dim(fg);
                }
                let mut bg = resolve_color(cell.bg, colors, theme);
                if cell.flags.contains(Flags::INVERSE) {
                    std::mem::swap(&mut fg, &mut bg);
                }
                let c = if cell.flags.contains(Flags::HIDDEN) {
                    ' '
                } else {
                    cell.c
                };
                cells.push(RenderCell {
                    c,
                    fg,
                    bg,
                    style: CellStyle {
                        bold: cell.flags.contains(Flags::BOLD),
                        italic: cell.flags.contains(Flags::ITALIC),
                        underline: cell.flags.intersects(Flags::ALL_UNDERLINES),
                    },
                });
            }
            lines.push(cells);
        }

        let cursor = term.mode().contains(TermMode::SHOW_CURSOR).then(|| {
            let point = grid.cursor.point;
            (point.line.0.max(0) as usize, point.column.0)
        });

        Some(Frame {
            lines,
            cursor,
            background: theme.background,
            foreground: theme.foreground,
        })
    }

    fn dispose(&mut self) {
        if self.term.take().is_some() {
            tracing::trace!("Surface disposed");
        }
    }

    fn is_disposed(&self) -> bool {
        self.term.is_none()
    }

    fn application_cursor(&self) -> bool {
        self.term
            .as_ref()
            .is_some_and(|term| term.mode().contains(TermMode::APP_CURSOR))
    }
}
