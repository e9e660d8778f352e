//! TTY rendering.
//!
//! Row 0 is the tab strip; the rows below show the active view. Layout is
//! computed into plain lines first so it can be tested without a terminal.

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use settings::constants::ssh::DEFAULT_PORT;
use settings::constants::tab_bar::HEIGHT_ROWS;
use std::io::{self, Stdout, Write};
use terminal::{CellStyle, Frame, ProcessHost, SurfaceArea};
use terminon_workspace::{
    ActiveView, ConfigManager, ProfileMenu, Section, SettingsPanel, Workspace, FORM_FIELDS,
    WELCOME_ITEMS,
};
use theme::{Rgb, Theme};

/// One line of a text panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLine {
    pub text: String,
    pub highlight: bool,
}

impl PanelLine {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlight: false,
        }
    }

    fn marked(text: impl Into<String>, highlight: bool) -> Self {
        Self {
            text: text.into(),
            highlight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLabel {
    pub title: String,
    pub active: bool,
}

pub fn tab_strip<H: ProcessHost>(workspace: &Workspace<H>) -> Vec<TabLabel> {
    let active = workspace.tabs().active_id();
    workspace
        .tabs()
        .tabs()
        .map(|tab| TabLabel {
            title: workspace.display_title(tab),
            active: Some(&tab.id) == active,
        })
        .collect()
}

pub fn welcome_lines(cursor: usize) -> Vec<PanelLine> {
    let mut lines = vec![
        PanelLine::plain(""),
        PanelLine::plain("  Terminon"),
        PanelLine::plain(""),
    ];
    for (index, item) in WELCOME_ITEMS.iter().enumerate() {
        lines.push(PanelLine::marked(
            format!("  {:<16} {}", item.label(), item.hint()),
            index == cursor,
        ));
    }
    lines.push(PanelLine::plain(""));
    lines.push(PanelLine::plain("  ↑/↓ move · enter open"));
    lines
}

pub fn settings_lines(panel: &SettingsPanel, config: &ConfigManager) -> Vec<PanelLine> {
    let mut lines = vec![PanelLine::plain("")];

    let in_themes = panel.section() == Section::Themes && panel.form().is_none();
    lines.push(PanelLine::plain(section_title("Themes", in_themes)));
    for (index, theme) in theme::themes().iter().enumerate() {
        let selected = if theme.id == config.theme_id() { "*" } else { " " };
        lines.push(PanelLine::marked(
            format!(
                "   {} {:<18} {} on {}",
                selected, theme.name, theme.foreground, theme.background
            ),
            in_themes && index == panel.theme_cursor(),
        ));
    }

    lines.push(PanelLine::plain(""));
    let in_profiles = panel.section() == Section::Profiles && panel.form().is_none();
    lines.push(PanelLine::plain(section_title("Profiles", in_profiles)));
    for profile in config.local_profiles() {
        lines.push(PanelLine::plain(format!("     {:<18} local", profile.name)));
    }
    for (index, profile) in config.remote_profiles().iter().enumerate() {
        let mut target = format!("{}@{}", profile.username, profile.host);
        if profile.port != DEFAULT_PORT {
            target.push_str(&format!(":{}", profile.port));
        }
        lines.push(PanelLine::marked(
            format!("     {:<18} {}", profile.name, target),
            in_profiles && index == panel.profile_cursor(),
        ));
    }

    if let Some(form) = panel.form() {
        lines.push(PanelLine::plain(""));
        lines.push(PanelLine::plain(" New SSH profile"));
        for (index, label) in FORM_FIELDS.iter().enumerate() {
            lines.push(PanelLine::marked(
                format!("   {:<14} {}", label, form.value(index)),
                index == form.field,
            ));
        }
        lines.push(PanelLine::plain(""));
        lines.push(PanelLine::plain(" tab next field · enter save · esc cancel"));
    } else {
        lines.push(PanelLine::plain(""));
        lines.push(PanelLine::plain(
            " tab switch section · enter select theme · a add profile · d delete",
        ));
    }

    if let Some(status) = panel.status() {
        lines.push(PanelLine::plain(format!(" {}", status)));
    }
    lines
}

fn section_title(title: &str, focused: bool) -> String {
    if focused {
        format!(" [{}]", title)
    } else {
        format!("  {}", title)
    }
}

pub fn menu_lines(menu: &ProfileMenu) -> Vec<PanelLine> {
    menu.entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            PanelLine::marked(format!(" {} ", entry.label()), index == menu.cursor())
        })
        .collect()
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Owns the TTY for the lifetime of the host: raw mode, the alternate screen
/// and bracketed paste, all restored on drop.
pub struct Screen {
    out: Stdout,
    cols: u16,
    rows: u16,
}

impl Screen {
    pub fn enter() -> Result<Self> {
        let (cols, rows) = crossterm::terminal::size().context("Failed to query terminal size")?;
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut out = io::stdout();
        if let Err(e) = execute!(out, EnterAlternateScreen, EnableBracketedPaste, Hide) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter alternate screen");
        }
        Ok(Self { out, cols, rows })
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Geometry available to terminal surfaces, below the tab strip.
    pub fn content_area(&self) -> SurfaceArea {
        SurfaceArea::from_cells(self.cols, self.content_rows().max(1))
    }

    fn content_rows(&self) -> u16 {
        self.rows.saturating_sub(HEIGHT_ROWS)
    }

    pub fn draw<H: ProcessHost>(&mut self, workspace: &Workspace<H>, awaiting_command: bool) -> Result<()> {
        let theme = workspace.config().theme();
        self.paint_tab_strip(&tab_strip(workspace), theme, awaiting_command)?;

        let mut cursor = None;
        match workspace.active_view() {
            ActiveView::Terminal(surface) => match surface.snapshot() {
                Some(frame) => cursor = self.paint_frame(&frame)?,
                None => self.paint_lines(&[], theme)?,
            },
            ActiveView::Settings(panel) => {
                self.paint_lines(&settings_lines(panel, workspace.config()), theme)?
            }
            ActiveView::Welcome { cursor } => self.paint_lines(&welcome_lines(cursor), theme)?,
        }

        if workspace.menu().is_open() {
            self.paint_overlay(&menu_lines(workspace.menu()), theme)?;
            cursor = None;
        }

        match cursor {
            Some((row, col)) => queue!(self.out, MoveTo(col, row + HEIGHT_ROWS), Show)?,
            None => queue!(self.out, Hide)?,
        }
        self.out.flush().context("Failed to flush screen")?;
        Ok(())
    }

    fn paint_tab_strip(&mut self, labels: &[TabLabel], theme: &Theme, awaiting_command: bool) -> io::Result<()> {
        queue!(
            self.out,
            MoveTo(0, 0),
            SetAttribute(Attribute::Reset),
            SetForegroundColor(color(theme.foreground)),
            SetBackgroundColor(color(theme.black)),
            Clear(ClearType::CurrentLine)
        )?;
        let mut used = 0usize;
        let width = self.cols as usize;
        for label in labels {
            let text = format!(" {} ", label.title);
            let len = text.chars().count();
            if used + len > width {
                break;
            }
            if label.active {
                queue!(
                    self.out,
                    SetBackgroundColor(color(theme.selection_rgb())),
                    SetAttribute(Attribute::Bold),
                    Print(&text),
                    SetAttribute(Attribute::Reset),
                    SetForegroundColor(color(theme.foreground)),
                    SetBackgroundColor(color(theme.black))
                )?;
            } else {
                queue!(self.out, Print(&text))?;
            }
            used += len;
        }
        if awaiting_command && width > 3 {
            queue!(self.out, MoveTo(self.cols - 3, 0), Print("^…"))?;
        }
        Ok(())
    }

    /// Paint an emulator frame; returns the cursor cell if it is visible.
    fn paint_frame(&mut self, frame: &Frame) -> io::Result<Option<(u16, u16)>> {
        let rows = self.content_rows() as usize;
        let cols = self.cols as usize;
        let mut fg = None;
        let mut bg = None;
        let mut style = CellStyle::default();

        queue!(self.out, SetAttribute(Attribute::Reset))?;
        for (row, line) in frame.lines.iter().take(rows).enumerate() {
            queue!(self.out, MoveTo(0, row as u16 + HEIGHT_ROWS))?;
            for cell in line.iter().take(cols) {
                if cell.style != style {
                    queue!(self.out, SetAttribute(Attribute::Reset))?;
                    if cell.style.bold {
                        queue!(self.out, SetAttribute(Attribute::Bold))?;
                    }
                    if cell.style.italic {
                        queue!(self.out, SetAttribute(Attribute::Italic))?;
                    }
                    if cell.style.underline {
                        queue!(self.out, SetAttribute(Attribute::Underlined))?;
                    }
                    style = cell.style;
                    // Reset also cleared the colours
                    fg = None;
                    bg = None;
                }
                if fg != Some(cell.fg) {
                    queue!(self.out, SetForegroundColor(color(cell.fg)))?;
                    fg = Some(cell.fg);
                }
                if bg != Some(cell.bg) {
                    queue!(self.out, SetBackgroundColor(color(cell.bg)))?;
                    bg = Some(cell.bg);
                }
                queue!(self.out, Print(cell.c))?;
            }
            if bg != Some(frame.background) {
                queue!(self.out, SetBackgroundColor(color(frame.background)))?;
                bg = Some(frame.background);
            }
            queue!(self.out, Clear(ClearType::UntilNewLine))?;
        }
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            SetBackgroundColor(color(frame.background))
        )?;
        for row in frame.lines.len()..rows {
            queue!(
                self.out,
                MoveTo(0, row as u16 + HEIGHT_ROWS),
                Clear(ClearType::CurrentLine)
            )?;
        }

        Ok(frame
            .cursor
            .filter(|&(row, col)| row < rows && col < cols)
            .map(|(row, col)| (row as u16, col as u16)))
    }

    fn paint_lines(&mut self, lines: &[PanelLine], theme: &Theme) -> io::Result<()> {
        let rows = self.content_rows() as usize;
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(color(theme.foreground)),
            SetBackgroundColor(color(theme.background))
        )?;
        for row in 0..rows {
            queue!(
                self.out,
                MoveTo(0, row as u16 + HEIGHT_ROWS),
                Clear(ClearType::CurrentLine)
            )?;
            if let Some(line) = lines.get(row) {
                self.print_line(line, self.cols as usize)?;
            }
        }
        Ok(())
    }

    fn paint_overlay(&mut self, lines: &[PanelLine], theme: &Theme) -> io::Result<()> {
        let width = lines
            .iter()
            .map(|line| line.text.chars().count())
            .max()
            .unwrap_or(0)
            .min(self.cols as usize);
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(color(theme.foreground)),
            SetBackgroundColor(color(theme.bright_black))
        )?;
        for (row, line) in lines.iter().take(self.content_rows() as usize).enumerate() {
            queue!(self.out, MoveTo(0, row as u16 + HEIGHT_ROWS))?;
            let padded = PanelLine::marked(format!("{:<width$}", line.text), line.highlight);
            self.print_line(&padded, width)?;
        }
        Ok(())
    }

    fn print_line(&mut self, line: &PanelLine, width: usize) -> io::Result<()> {
        let text: String = line.text.chars().take(width).collect();
        if line.highlight {
            queue!(
                self.out,
                SetAttribute(Attribute::Reverse),
                Print(text),
                SetAttribute(Attribute::NoReverse)
            )
        } else {
            queue!(self.out, Print(text))
        }
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            SetAttribute(Attribute::Reset),
            Show,
            DisableBracketedPaste,
            LeaveAlternateScreen
        );
        let _ = disable_raw_mode();
    }
}
